//! Flag resolution: turns an argument body into an [`ArgumentMap`].

use chat_command_core::{CommandSchema, FlagSchema};
use tracing::debug;

use crate::error::ParseError;
use crate::readers::{EntityDirectory, read_value};
use crate::scanner::Scanner;
use crate::value::ArgumentMap;

/// Character that introduces a named flag token.
pub const FLAG_INTRODUCER: char = '-';

/// Parses the argument body of one invocation against its command schema.
///
/// Tokens are consumed left to right. A token starting with `-` names a
/// flag (by name or alias, across the primary and named flags); any other
/// token fills the primary flag, which may happen only once. Named flags
/// given twice keep the last value. Once the input is exhausted, every
/// required flag still unset is reported in a single error.
///
/// A command without flags accepts only an empty body.
///
/// # Examples
///
/// ```
/// use chat_command_core::{CommandSchema, FlagSchema, FlagType};
/// use chat_command_parser::{ParseError, parse_arguments};
///
/// let tag = CommandSchema::new("tag")
///     .with_primary(FlagSchema::new("name", FlagType::String).required())
///     .with_flag(FlagSchema::new("user", FlagType::User).with_alias("u"));
///
/// let args = parse_arguments(&tag, "welcome -u 123456789012345678", None).unwrap();
/// assert_eq!(args.text("name"), Some("welcome"));
/// assert_eq!(args.id("user"), Some("123456789012345678"));
///
/// let err = parse_arguments(&tag, "-u 42", None).unwrap_err();
/// assert_eq!(err, ParseError::MissingValue(vec!["name".into()]));
/// ```
pub fn parse_arguments(
    schema: &CommandSchema,
    body: &str,
    directory: Option<&dyn EntityDirectory>,
) -> Result<ArgumentMap, ParseError> {
    if !schema.takes_arguments() {
        return if body.is_empty() {
            Ok(ArgumentMap::new())
        } else {
            Err(ParseError::NoArguments)
        };
    }

    let mut args = ArgumentMap::for_command(schema);
    let mut scanner = Scanner::new(body);

    loop {
        scanner.skip_spaces();
        if scanner.is_end() {
            break;
        }

        let flag = next_flag(schema, &mut scanner, &args)?;
        let value = read_value(&mut scanner, flag.flag_type, directory).map_err(|err| {
            debug!(command = %schema.name, flag = %flag.name, error = %err, "Rejected flag value");
            ParseError::InvalidValue(flag.name.clone())
        })?;
        args.set(&flag.name, value);
    }

    let missing: Vec<String> = schema
        .all_flags()
        .filter(|flag| flag.required && args.get(&flag.name).is_none())
        .map(|flag| flag.name.clone())
        .collect();
    if !missing.is_empty() {
        return Err(ParseError::MissingValue(missing));
    }

    Ok(args)
}

/// Decides which flag the token under the cursor belongs to.
///
/// Consumes the `-name` token for named flags; leaves positional tokens for
/// the value reader.
fn next_flag<'s>(
    schema: &'s CommandSchema,
    scanner: &mut Scanner<'_>,
    args: &ArgumentMap,
) -> Result<&'s FlagSchema, ParseError> {
    if scanner.peek() == Some(FLAG_INTRODUCER) {
        let token = scanner.read_word();
        let name = token.strip_prefix(FLAG_INTRODUCER).unwrap_or(&token);
        return schema
            .find_flag(name)
            .ok_or_else(|| ParseError::InvalidFlag(name.to_string()));
    }

    match &schema.primary {
        Some(primary) if !args.is_set(&primary.name) => Ok(primary),
        _ => Err(ParseError::ExpectedFlag {
            position: scanner.position(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use chat_command_core::FlagType;

    use super::*;
    use crate::readers::{DirectoryEntry, GuildDirectory};
    use crate::value::ArgValue;

    fn tag() -> CommandSchema {
        CommandSchema::new("tag")
            .with_primary(FlagSchema::new("name", FlagType::String).required())
            .with_flag(FlagSchema::new("user", FlagType::User).with_alias("u"))
    }

    fn notify() -> CommandSchema {
        CommandSchema::new("notify")
            .with_primary(FlagSchema::new("message", FlagType::String).required())
            .with_flag(FlagSchema::new("role", FlagType::Role).with_alias("r").required())
            .with_flag(FlagSchema::new("channel", FlagType::Channel).with_alias("c").required())
            .with_flag(FlagSchema::new("silent", FlagType::Void).with_alias("s"))
            .with_flag(FlagSchema::new("delay", FlagType::Number))
    }

    #[test]
    fn test_primary_then_named() {
        let args = parse_arguments(&tag(), "welcome -u 123456789012345678", None).unwrap();
        assert_eq!(args.text("name"), Some("welcome"));
        assert_eq!(args.id("user"), Some("123456789012345678"));
    }

    #[test]
    fn test_primary_may_come_last() {
        let args = parse_arguments(&tag(), "-user <@!42> welcome", None).unwrap();
        assert_eq!(args.text("name"), Some("welcome"));
        assert_eq!(args.id("user"), Some("42"));
    }

    #[test]
    fn test_primary_by_name() {
        let args = parse_arguments(&tag(), "-name welcome", None).unwrap();
        assert_eq!(args.text("name"), Some("welcome"));
    }

    #[test]
    fn test_quoted_primary_leaves_optional_unset() {
        let args = parse_arguments(&tag(), "\"multi word name\"", None).unwrap();
        assert_eq!(args.text("name"), Some("multi word name"));
        assert!(args.contains("user"));
        assert_eq!(args.get("user"), None);
    }

    #[test]
    fn test_quoted_primary_followed_by_flag() {
        let args = parse_arguments(&tag(), "\"multi word\" -u 7", None).unwrap();
        assert_eq!(args.text("name"), Some("multi word"));
        assert_eq!(args.id("user"), Some("7"));
    }

    #[test]
    fn test_extra_spaces_between_tokens() {
        let args = parse_arguments(&tag(), "  welcome   -u  7  ", None).unwrap();
        assert_eq!(args.text("name"), Some("welcome"));
        assert_eq!(args.id("user"), Some("7"));
    }

    #[test]
    fn test_unknown_flag() {
        let err = parse_arguments(&tag(), "welcome -badflag hi", None).unwrap_err();
        assert_eq!(err, ParseError::InvalidFlag("badflag".into()));
    }

    #[test]
    fn test_lone_dash_is_unknown_flag() {
        let err = parse_arguments(&tag(), "welcome -", None).unwrap_err();
        assert_eq!(err, ParseError::InvalidFlag(String::new()));
    }

    #[test]
    fn test_flag_names_are_case_sensitive() {
        let err = parse_arguments(&tag(), "welcome -U 7", None).unwrap_err();
        assert_eq!(err, ParseError::InvalidFlag("U".into()));
    }

    #[test]
    fn test_second_positional_is_expected_flag() {
        let err = parse_arguments(&tag(), "welcome extra", None).unwrap_err();
        assert_eq!(err, ParseError::ExpectedFlag { position: 8 });
    }

    #[test]
    fn test_positional_without_primary() {
        let schema =
            CommandSchema::new("mute").with_flag(FlagSchema::new("user", FlagType::User));
        let err = parse_arguments(&schema, "-user 1 2", None).unwrap_err();
        assert_eq!(err, ParseError::ExpectedFlag { position: 8 });
    }

    #[test]
    fn test_named_flag_overwrites() {
        let args = parse_arguments(&tag(), "welcome -u 1 -user 2", None).unwrap();
        assert_eq!(args.id("user"), Some("2"));
    }

    #[test]
    fn test_invalid_value_names_the_flag() {
        let err = parse_arguments(&tag(), "welcome -u nobody", None).unwrap_err();
        assert_eq!(err, ParseError::InvalidValue("user".into()));
    }

    #[test]
    fn test_unterminated_quote_is_invalid_value() {
        let err = parse_arguments(&tag(), "\"hello", None).unwrap_err();
        assert_eq!(err, ParseError::InvalidValue("name".into()));
    }

    #[test]
    fn test_missing_values_are_batched_in_declaration_order() {
        let err = parse_arguments(&notify(), "-s", None).unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingValue(vec![
                "message".into(),
                "role".into(),
                "channel".into()
            ])
        );
        assert_eq!(
            err.to_string(),
            ":x: Missing value of `message`, `role`, `channel`"
        );
    }

    #[test]
    fn test_directory_lookup_and_void() {
        let directory = GuildDirectory {
            roles: vec![DirectoryEntry::new("100", "Moderators")],
            channels: vec![DirectoryEntry::new("200", "support")],
        };
        let args = parse_arguments(
            &notify(),
            "-r Moderators -c support 'server restart' -s -delay 2.5",
            Some(&directory),
        )
        .unwrap();

        assert_eq!(args.text("message"), Some("server restart"));
        assert_eq!(args.id("role"), Some("100"));
        assert_eq!(args.id("channel"), Some("200"));
        assert!(args.flag("silent"));
        assert_eq!(args.number("delay"), Some(2.5));
    }

    #[test]
    fn test_void_flag_defaults_to_false() {
        let args = parse_arguments(&notify(), "hi -r 1 -c 2", None).unwrap();
        assert_eq!(args.get("silent"), Some(&ArgValue::Bool(false)));
        assert_eq!(args.get("delay"), None);
    }

    #[test]
    fn test_no_flags_declared() {
        let ping = CommandSchema::new("ping");
        assert_eq!(parse_arguments(&ping, "", None), Ok(ArgumentMap::new()));
        assert_eq!(
            parse_arguments(&ping, "now", None),
            Err(ParseError::NoArguments)
        );
        assert_eq!(
            parse_arguments(&ping, " ", None),
            Err(ParseError::NoArguments)
        );
    }

    #[test]
    fn test_empty_body_with_optional_primary() {
        let rory = CommandSchema::new("rory")
            .with_primary(FlagSchema::new("id", FlagType::Number));
        let args = parse_arguments(&rory, "", None).unwrap();
        assert_eq!(args.get("id"), None);
        assert_eq!(args.len(), 1);
    }
}
