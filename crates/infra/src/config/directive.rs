//! Line-oriented directive format
//!
//! A compact alternative to TOML/JSON for hand-written gate files:
//!
//! ```text
//! # weekday mornings and weekend afternoons
//! timezone Europe/Berlin
//! log_level debug
//! cron "0 10 * * 1-5" "0 11 * * 1-5"
//! cron '0 15 * * 0,6' '0 16 * * 0,6'
//! ```
//!
//! Arguments are whitespace separated; cron rules contain spaces and must be
//! quoted with double or single quotes. Blank lines and lines starting with
//! `#` are ignored.

use thiserror::Error;
use timegate_domain::constants::CRON_DIRECTIVE;
use timegate_domain::{GateConfig, LogFormat, TimeGateError, WindowRuleConfig, WindowSetConfig};

/// Error raised while reading a directive file; line numbers are 1-based.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectiveError {
    #[error("line {line}: unterminated quote")]
    UnterminatedQuote { line: usize },

    #[error("line {line}: '{directive}' expects {expected} argument(s), got {found}")]
    WrongArity { line: usize, directive: String, expected: usize, found: usize },

    #[error("line {line}: unknown directive '{directive}'")]
    UnknownDirective { line: usize, directive: String },

    #[error("line {line}: invalid value '{value}' for '{directive}'")]
    InvalidValue { line: usize, directive: String, value: String },
}

impl From<DirectiveError> for TimeGateError {
    fn from(err: DirectiveError) -> Self {
        Self::Config(err.to_string())
    }
}

/// Parse a directive file into a gate configuration.
///
/// Settings not mentioned in the file keep their defaults.
///
/// # Errors
/// Returns [`DirectiveError`] for malformed lines. Rule syntax is not checked
/// here; that happens when the matcher is built.
pub fn parse_directives(text: &str) -> Result<GateConfig, DirectiveError> {
    let mut config = GateConfig::new(WindowSetConfig::default());

    for (offset, raw) in text.lines().enumerate() {
        let line = offset + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut tokens =
            tokenize(trimmed).ok_or(DirectiveError::UnterminatedQuote { line })?.into_iter();
        let Some(directive) = tokens.next() else { continue };
        let args: Vec<String> = tokens.collect();

        match directive.as_str() {
            CRON_DIRECTIVE => {
                let [start, end] = expect_args::<2>(line, &directive, args)?;
                config.window_set.windows.push(WindowRuleConfig { start, end });
            }
            "timezone" => {
                let [zone] = expect_args::<1>(line, &directive, args)?;
                config.timezone = zone;
            }
            "log_level" => {
                let [level] = expect_args::<1>(line, &directive, args)?;
                config.log_level = level;
            }
            "log_format" => {
                let [format] = expect_args::<1>(line, &directive, args)?;
                config.log_format = format.parse::<LogFormat>().map_err(|_| {
                    DirectiveError::InvalidValue { line, directive: directive.clone(), value: format }
                })?;
            }
            _ => return Err(DirectiveError::UnknownDirective { line, directive }),
        }
    }

    Ok(config)
}

fn expect_args<const N: usize>(
    line: usize,
    directive: &str,
    args: Vec<String>,
) -> Result<[String; N], DirectiveError> {
    let found = args.len();
    args.try_into().map_err(|_| DirectiveError::WrongArity {
        line,
        directive: directive.to_string(),
        expected: N,
        found,
    })
}

/// Split a line into arguments, honouring single and double quotes.
///
/// Returns `None` on an unterminated quote.
fn tokenize(line: &str) -> Option<Vec<String>> {
    let mut args = Vec::new();
    let mut chars = line.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let mut arg = String::new();
        if c == '"' || c == '\'' {
            chars.next();
            loop {
                match chars.next() {
                    Some(next) if next == c => break,
                    Some(next) => arg.push(next),
                    None => return None,
                }
            }
        } else {
            while let Some(&next) = chars.peek() {
                if next.is_whitespace() {
                    break;
                }
                arg.push(next);
                chars.next();
            }
        }
        args.push(arg);
    }

    Some(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_quotes() {
        assert_eq!(
            tokenize(r#"cron "0 10 * * 1-5" '0 11 * * 1-5'"#).unwrap(),
            vec!["cron", "0 10 * * 1-5", "0 11 * * 1-5"]
        );
        assert_eq!(tokenize("timezone   UTC").unwrap(), vec!["timezone", "UTC"]);
        assert!(tokenize(r#"cron "0 10 * * *"#).is_none());
    }

    /// Validates a full directive file.
    ///
    /// Assertions:
    /// - comments and blank lines are skipped
    /// - cron pairs keep file order
    /// - scalar settings override the defaults
    #[test]
    fn test_parse_directives_full_file() {
        let text = r#"
# gate hours
timezone Europe/Berlin
log_level debug
log_format json

cron "0 10 * * 1-5" "0 11 * * 1-5"
cron '0 15 * * 0,6' '0 16 * * 0,6'
"#;

        let config = parse_directives(text).unwrap();

        assert_eq!(config.timezone, "Europe/Berlin");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(
            config.window_set.windows,
            vec![
                WindowRuleConfig { start: "0 10 * * 1-5".into(), end: "0 11 * * 1-5".into() },
                WindowRuleConfig { start: "0 15 * * 0,6".into(), end: "0 16 * * 0,6".into() },
            ]
        );
    }

    #[test]
    fn test_defaults_when_only_windows_given() {
        let config = parse_directives(r#"cron "@daily" "@hourly""#).unwrap();

        assert_eq!(config.timezone, "UTC");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.window_set.windows.len(), 1);
    }

    #[test]
    fn test_cron_with_one_argument_names_line() {
        let err = parse_directives("# header\ncron \"0 10 * * *\"\n").unwrap_err();

        assert_eq!(
            err,
            DirectiveError::WrongArity {
                line: 2,
                directive: "cron".to_string(),
                expected: 2,
                found: 1
            }
        );
        assert_eq!(err.to_string(), "line 2: 'cron' expects 2 argument(s), got 1");
    }

    /// Unquoted rules split into many arguments.
    #[test]
    fn test_unquoted_cron_rules_are_rejected() {
        let err = parse_directives("cron 0 10 * * * 0 11 * * *").unwrap_err();
        assert!(matches!(err, DirectiveError::WrongArity { line: 1, found: 10, .. }));
    }

    #[test]
    fn test_unknown_directive() {
        let err = parse_directives("\n\nwindow a b").unwrap_err();
        assert_eq!(
            err,
            DirectiveError::UnknownDirective { line: 3, directive: "window".to_string() }
        );
    }

    #[test]
    fn test_invalid_log_format() {
        let err = parse_directives("log_format xml").unwrap_err();
        assert!(matches!(err, DirectiveError::InvalidValue { line: 1, .. }));
    }

    #[test]
    fn test_unterminated_quote_converts_to_config_error() {
        let err: TimeGateError = parse_directives("cron \"0 10 * * *").unwrap_err().into();
        assert_eq!(err, TimeGateError::Config("line 1: unterminated quote".to_string()));
    }
}
