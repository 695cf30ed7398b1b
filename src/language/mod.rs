//! Supported languages, their backend aliases and example snippets.

use std::{fmt, str::FromStr};

use anyhow::{anyhow, Error};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    Javascript,
    Java,
    C,
    Cpp,
    Go,
    Rust,
    Bash,
}

impl Language {
    /// Order is stable: the first entry is the default selection.
    pub const ALL: [Language; 8] = [
        Language::Python,
        Language::Javascript,
        Language::Java,
        Language::C,
        Language::Cpp,
        Language::Go,
        Language::Rust,
        Language::Bash,
    ];

    /// Name sent to the execution service.
    pub fn name(self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Javascript => "javascript",
            Language::Java => "java",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Go => "go",
            Language::Rust => "rust",
            Language::Bash => "bash",
        }
    }

    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Language::Python => &["py", "python3"],
            Language::Javascript => &["js", "node"],
            Language::Java => &["java"],
            Language::C => &["c"],
            Language::Cpp => &["cpp", "c++"],
            Language::Go => &["go", "golang"],
            Language::Rust => &["rs", "rust"],
            Language::Bash => &["sh", "bash"],
        }
    }

    /// Canonical snippet for "load example"; every supported language has one.
    pub fn example(self) -> &'static str {
        match self {
            Language::Python => "def greet(name):\n  print(f\"Hello, {name}!\")\n\ngreet(\"Streamlit\")",
            Language::Javascript => {
                "function greet(name) {\n  console.log(`Hello, ${name}!`);\n}\n\ngreet(\"Streamlit\");"
            }
            Language::Java => {
                "\npublic class HelloWorld {\n    public static void main(String[] args) {\n        String name = \"Streamlit\";\n        System.out.println(\"Hello, \" + name + \"!\");\n    }\n}\n"
            }
            Language::C => {
                "\n#include <stdio.h>\n\nint main() {\n   char name[] = \"Streamlit\";\n   printf(\"Hello, %s!\\n\", name);\n   return 0;\n}\n"
            }
            Language::Cpp => {
                "\n#include <iostream>\n#include <string>\n\nint main() {\n    std::string name = \"Streamlit\";\n    std::cout << \"Hello, \" << name << \"!\" << std::endl;\n    return 0;\n}\n"
            }
            Language::Go => {
                "\npackage main\n\nimport \"fmt\"\n\nfunc main() {\n    name := \"Streamlit\"\n    fmt.Printf(\"Hello, %s!\\n\", name)\n}\n"
            }
            Language::Rust => {
                "\nfn main() {\n    let name = \"Streamlit\";\n    println!(\"Hello, {}!\", name);\n}\n"
            }
            Language::Bash => "name=\"Streamlit\"\necho \"Hello, $name!\"",
        }
    }

    /// Next language in list order, wrapping around.
    pub fn next(self) -> Language {
        let i = self.index();
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Language {
        let i = self.index();
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|l| *l == self).unwrap_or(0)
    }
}

impl Default for Language {
    fn default() -> Self {
        Self::ALL[0]
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = Error;

    /// Accepts the canonical name or any alias, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|l| l.name() == lower || l.aliases().contains(&lower.as_str()))
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|l| l.name()).collect();
                anyhow!("unsupported language '{}' (expected one of: {})", s, names.join(", "))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_first_in_list() {
        assert_eq!(Language::default(), Language::Python);
        assert_eq!(Language::ALL[0], Language::Python);
    }

    #[test]
    fn parses_names_and_aliases() {
        assert_eq!("python".parse::<Language>().unwrap(), Language::Python);
        assert_eq!("PY".parse::<Language>().unwrap(), Language::Python);
        assert_eq!("node".parse::<Language>().unwrap(), Language::Javascript);
        assert_eq!("c++".parse::<Language>().unwrap(), Language::Cpp);
        assert_eq!("golang".parse::<Language>().unwrap(), Language::Go);
        assert_eq!(" rs ".parse::<Language>().unwrap(), Language::Rust);
        assert!("cobol".parse::<Language>().is_err());
    }

    #[test]
    fn next_and_prev_wrap() {
        assert_eq!(Language::Bash.next(), Language::Python);
        assert_eq!(Language::Python.prev(), Language::Bash);
        assert_eq!(Language::Java.next(), Language::C);
    }

    #[test]
    fn every_language_has_an_example() {
        for lang in Language::ALL {
            let snippet = lang.example();
            assert!(snippet.contains("Streamlit"), "{lang}");
            assert!(!snippet.trim().is_empty(), "{lang}");
        }
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Language::Cpp).unwrap(), "\"cpp\"");
    }
}
