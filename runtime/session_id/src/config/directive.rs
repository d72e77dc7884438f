use super::SessionIdConfig;
use crate::DIRECTIVE;

impl SessionIdConfig {
    /// Parse the configuration out of one or more `session_id <cookie_domain>` directives.
    ///
    /// Blank lines and lines starting with `#` are ignored.
    /// The argument can be wrapped in double quotes.
    /// If the directive appears more than once, the last occurrence wins.
    ///
    /// # Example
    ///
    /// ```rust
    /// use session_id::SessionIdConfig;
    ///
    /// let config = SessionIdConfig::from_directive("session_id example.com").unwrap();
    /// assert_eq!(config.cookie_domain, "example.com");
    ///
    /// // Exactly one argument is expected.
    /// assert!(SessionIdConfig::from_directive("session_id a.com b.com").is_err());
    /// ```
    pub fn from_directive(input: &str) -> Result<Self, DirectiveError> {
        let mut config = None;
        for (index, line) in input.lines().enumerate() {
            let line_number = index + 1;
            let tokens = tokenize(line).map_err(|()| DirectiveError::UnterminatedQuote {
                line: line_number,
            })?;
            let Some((name, args)) = tokens.split_first() else {
                continue;
            };
            if name.starts_with('#') {
                continue;
            }
            if name != DIRECTIVE {
                return Err(DirectiveError::UnknownDirective {
                    name: name.to_owned(),
                    line: line_number,
                });
            }
            match args {
                [] => {
                    return Err(DirectiveError::MissingArgument { line: line_number });
                }
                [cookie_domain] => {
                    config = Some(SessionIdConfig::new(cookie_domain.to_owned()));
                }
                [_, extra @ ..] => {
                    return Err(DirectiveError::TooManyArguments {
                        extra: extra.to_vec(),
                        line: line_number,
                    });
                }
            }
        }
        let config = config.ok_or(DirectiveError::Empty)?;
        tracing::info!(
            cookie_domain = %config.cookie_domain,
            handler = crate::HANDLER_ID,
            "Parsed `{DIRECTIVE}` directive"
        );
        Ok(config)
    }
}

/// Split a line into whitespace-separated tokens.
/// Double quotes group whitespace-separated words into a single token.
fn tokenize(line: &str) -> Result<Vec<String>, ()> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut in_quotes = false;
    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                in_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }
    if in_quotes {
        return Err(());
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

#[non_exhaustive]
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
/// The error returned by [`SessionIdConfig::from_directive`].
pub enum DirectiveError {
    #[error("No `session_id` directive was found.")]
    Empty,
    #[error("Unknown directive `{name}` on line {line}. Expected `session_id <cookie_domain>`.")]
    UnknownDirective { name: String, line: usize },
    #[error("The `session_id` directive on line {line} is missing its argument. Expected `session_id <cookie_domain>`.")]
    MissingArgument { line: usize },
    #[error("The `session_id` directive on line {line} takes a single argument, but it was also given {extra:?}.")]
    TooManyArguments { extra: Vec<String>, line: usize },
    #[error("Unterminated double quote on line {line}.")]
    UnterminatedQuote { line: usize },
}
