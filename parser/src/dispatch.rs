//! Message and structured-invocation dispatch.
//!
//! A [`Dispatcher`] owns the registry and one handler per command. It is
//! built once at startup through [`DispatcherBuilder`] and is immutable
//! afterwards, so it can be shared freely between tasks.
//!
//! # Examples
//!
//! ```
//! use chat_command_core::{CommandSchema, FlagSchema, FlagType};
//! use chat_command_parser::{CommandContext, Dispatcher, Outcome, Responder};
//! use std::sync::Mutex;
//!
//! #[derive(Default)]
//! struct Recorder(Mutex<Vec<String>>);
//!
//! impl Responder for Recorder {
//!     fn reply(&self, content: &str) -> anyhow::Result<()> {
//!         self.0.lock().unwrap().push(content.to_string());
//!         Ok(())
//!     }
//! }
//!
//! let dispatcher = Dispatcher::builder()
//!     .command(
//!         CommandSchema::new("say")
//!             .with_primary(FlagSchema::new("content", FlagType::String).required()),
//!         |ctx: &CommandContext<'_>, args: &chat_command_parser::ArgumentMap| {
//!             ctx.reply(args.text("content").unwrap_or_default())
//!         },
//!     )
//!     .build()
//!     .unwrap();
//!
//! let recorder = Recorder::default();
//! let ctx = CommandContext::new("1", "2", &recorder);
//!
//! assert_eq!(dispatcher.handle_message(&ctx, "!say 'hi there'"), Outcome::Executed);
//! assert_eq!(dispatcher.handle_message(&ctx, "say hi"), Outcome::Ignored);
//! assert_eq!(recorder.0.lock().unwrap().as_slice(), ["hi there"]);
//! ```

use chat_command_core::{CommandRegistry, CommandSchema, ValidationError, validate_registry};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::error::ParseError;
use crate::lookup::lookup;
use crate::readers::EntityDirectory;
use crate::structured::{ReplyStrategy, StructuredOption, arguments_from_options};
use crate::value::ArgumentMap;

/// Reply sent when a handler fails.
pub const FAILURE_NOTICE: &str = ":boom: Something went wrong";

/// The capability to answer the invoking user.
pub trait Responder {
    /// Sends a reply in the invoking channel.
    fn reply(&self, content: &str) -> anyhow::Result<()>;

    /// Acknowledges a structured invocation before a slow handler runs.
    ///
    /// Responders without a separate acknowledgement step keep the default.
    fn defer(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Who invoked a command, where, and how to answer.
pub struct CommandContext<'a> {
    pub user_id: String,
    pub channel_id: String,
    /// `None` for direct messages.
    pub guild_id: Option<String>,
    /// Role and channel names of the guild, when there is one.
    pub directory: Option<&'a dyn EntityDirectory>,
    pub responder: &'a dyn Responder,
}

impl<'a> CommandContext<'a> {
    /// Creates a context for a direct message.
    pub fn new(user_id: &str, channel_id: &str, responder: &'a dyn Responder) -> Self {
        Self {
            user_id: user_id.to_string(),
            channel_id: channel_id.to_string(),
            guild_id: None,
            directory: None,
            responder,
        }
    }

    /// Places the context inside a guild whose names resolve via `directory`.
    pub fn in_guild(mut self, guild_id: &str, directory: &'a dyn EntityDirectory) -> Self {
        self.guild_id = Some(guild_id.to_string());
        self.directory = Some(directory);
        self
    }

    /// Replies through the responder.
    pub fn reply(&self, content: &str) -> anyhow::Result<()> {
        self.responder.reply(content)
    }

    fn notify(&self, content: &str) {
        if let Err(err) = self.responder.reply(content) {
            warn!(channel = %self.channel_id, error = %err, "Failed to send reply");
        }
    }
}

/// The executable part of a command.
pub trait CommandHandler: Send + Sync {
    fn execute(&self, ctx: &CommandContext<'_>, args: &ArgumentMap) -> anyhow::Result<()>;
}

impl<F> CommandHandler for F
where
    F: Fn(&CommandContext<'_>, &ArgumentMap) -> anyhow::Result<()> + Send + Sync,
{
    fn execute(&self, ctx: &CommandContext<'_>, args: &ArgumentMap) -> anyhow::Result<()> {
        self(ctx, args)
    }
}

/// Message-surface settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Prefixes a message must start with to be read as a command. An empty
    /// list accepts every message.
    #[serde(default = "default_prefixes")]
    pub prefixes: Vec<String>,
}

fn default_prefixes() -> Vec<String> {
    vec!["!".to_string()]
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            prefixes: default_prefixes(),
        }
    }
}

impl DispatchConfig {
    pub fn with_prefixes<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /// Removes the first matching prefix, or returns `None` if the content
    /// is not addressed to the bot.
    ///
    /// # Examples
    ///
    /// ```
    /// use chat_command_parser::DispatchConfig;
    ///
    /// let config = DispatchConfig::with_prefixes(["!", "bot "]);
    /// assert_eq!(config.strip_prefix("!ping"), Some("ping"));
    /// assert_eq!(config.strip_prefix("bot ping"), Some("ping"));
    /// assert_eq!(config.strip_prefix("ping"), None);
    /// ```
    pub fn strip_prefix<'c>(&self, content: &'c str) -> Option<&'c str> {
        if self.prefixes.is_empty() {
            return Some(content);
        }
        self.prefixes
            .iter()
            .find_map(|prefix| content.strip_prefix(prefix.as_str()))
    }
}

/// What became of one incoming message or invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Not a command; nothing was sent.
    Ignored,
    /// The arguments did not parse; the error text was sent.
    Rejected(ParseError),
    /// The handler ran and succeeded.
    Executed,
    /// The handler failed; the generic failure notice was sent.
    Failed,
}

/// Routes messages and structured invocations to command handlers.
pub struct Dispatcher {
    registry: CommandRegistry,
    handlers: Vec<Box<dyn CommandHandler>>,
    config: DispatchConfig,
}

impl Dispatcher {
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Handles one chat message.
    ///
    /// Messages without a prefix or naming no command are ignored. Parse
    /// errors are sent back verbatim. Handler errors are logged and answered
    /// with [`FAILURE_NOTICE`].
    pub fn handle_message(&self, ctx: &CommandContext<'_>, content: &str) -> Outcome {
        let Some(line) = self.config.strip_prefix(content) else {
            return Outcome::Ignored;
        };
        let Some(invocation) = lookup(&self.registry, line) else {
            debug!(line, "No command matched");
            return Outcome::Ignored;
        };

        match invocation.parse(ctx.directory) {
            Ok(args) => self.run(invocation.index, invocation.command, ctx, &args),
            Err(err) => {
                debug!(command = %invocation.command.name, error = %err, "Rejected message");
                ctx.notify(&err.to_string());
                Outcome::Rejected(err)
            }
        }
    }

    /// Handles a structured invocation of the command named exactly `name`.
    ///
    /// Deferred commands are acknowledged before their handler runs.
    pub fn handle_structured(
        &self,
        ctx: &CommandContext<'_>,
        name: &str,
        options: &[StructuredOption],
    ) -> Outcome {
        let Some((index, command)) = self
            .registry
            .iter()
            .enumerate()
            .find(|(_, command)| command.name == name)
        else {
            debug!(name, "No command matched structured invocation");
            return Outcome::Ignored;
        };

        let args = match arguments_from_options(command, options) {
            Ok(args) => args,
            Err(err) => {
                ctx.notify(&err.to_string());
                return Outcome::Rejected(err);
            }
        };

        if ReplyStrategy::for_command(command) == ReplyStrategy::Deferred {
            if let Err(err) = ctx.responder.defer() {
                warn!(command = %command.name, error = %err, "Failed to defer reply");
            }
        }

        self.run(index, command, ctx, &args)
    }

    fn run(
        &self,
        index: usize,
        command: &CommandSchema,
        ctx: &CommandContext<'_>,
        args: &ArgumentMap,
    ) -> Outcome {
        match self.handlers[index].execute(ctx, args) {
            Ok(()) => Outcome::Executed,
            Err(err) => {
                error!(
                    command = %command.name,
                    user = %ctx.user_id,
                    error = %format!("{err:#}"),
                    "Command handler failed"
                );
                ctx.notify(FAILURE_NOTICE);
                Outcome::Failed
            }
        }
    }
}

/// Collects commands and their handlers into a [`Dispatcher`].
pub struct DispatcherBuilder {
    commands: Vec<CommandSchema>,
    handlers: Vec<Box<dyn CommandHandler>>,
    config: DispatchConfig,
}

impl DispatcherBuilder {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            handlers: Vec::new(),
            config: DispatchConfig::default(),
        }
    }

    pub fn config(mut self, config: DispatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Registers a command answered by a closure.
    pub fn command<F>(self, schema: CommandSchema, handler: F) -> Self
    where
        F: Fn(&CommandContext<'_>, &ArgumentMap) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.command_handler(schema, handler)
    }

    /// Registers a command answered by any [`CommandHandler`].
    pub fn command_handler<H>(mut self, schema: CommandSchema, handler: H) -> Self
    where
        H: CommandHandler + 'static,
    {
        self.commands.push(schema);
        self.handlers.push(Box::new(handler));
        self
    }

    /// Validates the collected commands and freezes them.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found in the registry.
    pub fn build(self) -> Result<Dispatcher, ValidationError> {
        let registry = CommandRegistry::new(self.commands);
        if let Some(err) = validate_registry(&registry).into_iter().next() {
            return Err(err);
        }
        Ok(Dispatcher {
            registry,
            handlers: self.handlers,
            config: self.config,
        })
    }
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}
