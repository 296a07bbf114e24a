use std::fmt;
use std::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod model;

// Author is an embedded value object of a book, two authors are the same author when
// both names match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl Author {
    pub fn new(first_name: &str, last_name: &str) -> Self {
        Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        }
    }
}

impl Display for Author {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use crate::books::domain::Author;

    #[tokio::test]
    async fn test_should_collapse_equal_authors() {
        let authors = BTreeSet::from([
            Author::new("Joshua", "Bloch"),
            Author::new("Joshua", "Bloch"),
            Author::new("Martin", "Fowler"),
        ]);
        assert_eq!(2, authors.len());
        assert_eq!("Joshua Bloch", Author::new("Joshua", "Bloch").to_string());
    }

    #[tokio::test]
    async fn test_should_serialize_camel_case() {
        let json = serde_json::to_string(&Author::new("John", "Doe")).expect("should serialize author");
        assert_eq!(r#"{"firstName":"John","lastName":"Doe"}"#, json);
    }
}
