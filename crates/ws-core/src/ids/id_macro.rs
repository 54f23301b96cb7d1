//! Common macro for implementing ID wrapper types.

macro_rules! impl_id {
    ($($name:ident),* $(,)?) => {
        $(
            impl $name {
                pub fn from_string(s: String) -> Self {
                    Self(s)
                }

                pub fn as_str(&self) -> &str {
                    &self.0
                }

                pub fn into_inner(self) -> String {
                    self.0
                }

                /// Reads an identifier out of a JSON value.
                ///
                /// REST payloads carry ids as numbers or strings; both map to the
                /// same textual id. Anything else yields `None`.
                pub fn from_json(value: &serde_json::Value) -> Option<Self> {
                    match value {
                        serde_json::Value::String(s) if !s.is_empty() => Some(Self(s.clone())),
                        serde_json::Value::Number(n) => Some(Self(n.to_string())),
                        _ => None,
                    }
                }
            }

            impl std::fmt::Display for $name {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    write!(f, "{}", self.0)
                }
            }

            impl From<String> for $name {
                fn from(s: String) -> Self {
                    Self(s)
                }
            }

            impl From<&str> for $name {
                fn from(s: &str) -> Self {
                    Self(s.to_string())
                }
            }

            impl AsRef<str> for $name {
                fn as_ref(&self) -> &str {
                    &self.0
                }
            }

            impl<'de> serde::Deserialize<'de> for $name {
                fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
                where
                    D: serde::Deserializer<'de>,
                {
                    #[derive(serde::Deserialize)]
                    #[serde(untagged)]
                    enum Raw {
                        Text(String),
                        Int(i64),
                        Uint(u64),
                    }

                    Ok(match Raw::deserialize(deserializer)? {
                        Raw::Text(s) => Self(s),
                        Raw::Int(n) => Self(n.to_string()),
                        Raw::Uint(n) => Self(n.to_string()),
                    })
                }
            }

            impl From<$name> for String {
                fn from(id: $name) -> String {
                    id.0
                }
            }
        )*
    };
}

pub(crate) use impl_id;
