use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "bioc")]
#[command(about = "Record and browse biodiversity occurrences")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Configuration file (default: ~/.config/bioc/config.toml)
	#[arg(long, short = 'c', value_name = "PATH", global = true)]
	pub config: Option<PathBuf>,

	/// Verbose logging
	#[arg(long, short = 'v', global = true)]
	pub verbose: bool,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// Sign in and remember the session
	Login {
		/// Account e-mail
		#[arg(long, short = 'e')]
		email: String,
		/// Password (prompted for if omitted; the prompt does not hide typing)
		#[arg(long)]
		password: Option<String>,
	},
	/// Create an account
	Register {
		/// Display name
		#[arg(long, short = 'u')]
		username: String,
		/// Account e-mail
		#[arg(long, short = 'e')]
		email: String,
		/// Password (prompted for if omitted; the prompt does not hide typing)
		#[arg(long)]
		password: Option<String>,
	},
	/// Forget the stored session
	Logout,
	/// Show the signed-in account
	Whoami,
	/// List or search occurrences
	List {
		/// Only records you created
		#[arg(long)]
		mine: bool,
		/// Keyword search
		#[arg(long, short = 'q')]
		query: Option<String>,
		/// Restrict search to a taxon id
		#[arg(long)]
		taxon: Option<String>,
	},
	/// Show one occurrence
	Show {
		/// Record id
		id: String,
	},
	/// Record a new occurrence
	Create(#[command(flatten)] RecordArgs),
	/// Replace an occurrence you created
	Edit {
		/// Record id
		id: String,
		/// Drop the existing traits before adding new ones
		#[arg(long)]
		clear_traits: bool,
		/// Fields to change.
		#[command(flatten)]
		record: RecordArgs,
	},
	/// Delete an occurrence
	Delete {
		/// Record id
		id: String,
		/// Skip the confirmation prompt
		#[arg(long, short = 'y')]
		yes: bool,
	},
	/// Query a vocabulary index
	Lookup {
		/// Index to query.
		#[arg(value_enum)]
		kind: LookupKind,
		/// Search text
		text: String,
	},
}

/// Record fields shared by `create` and `edit`.
#[derive(Args, Debug, Default, Clone, PartialEq, Eq)]
pub struct RecordArgs {
	/// Taxon id, e.g. ncbi:34844
	#[arg(long, requires = "taxon_label", conflicts_with = "taxon_search")]
	pub taxon_id: Option<String>,
	/// Taxon display label
	#[arg(long, requires = "taxon_id")]
	pub taxon_label: Option<String>,
	/// Use the first taxon matching this text
	#[arg(long, value_name = "TEXT")]
	pub taxon_search: Option<String>,
	/// Free-text trait, repeatable
	#[arg(long = "trait", value_name = "PREDICATE=VALUE")]
	pub traits: Vec<TraitArg>,
	/// Trait resolved against the vocabularies, repeatable
	#[arg(long = "trait-search", value_name = "PREDICATE=VALUE")]
	pub trait_searches: Vec<TraitArg>,
	/// Free-form notes
	#[arg(long)]
	pub remarks: Option<String>,
	/// Hide the record from other users
	#[arg(long, conflicts_with = "public")]
	pub private: bool,
	/// Show the record to other users
	#[arg(long)]
	pub public: bool,
}

impl RecordArgs {
	/// Requested visibility, if any flag was given.
	pub fn visibility(&self) -> Option<bool> {
		match (self.public, self.private) {
			(true, _) => Some(true),
			(_, true) => Some(false),
			_ => None,
		}
	}
}

/// `predicate=value` pair from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraitArg {
	/// Predicate text.
	pub predicate: String,
	/// Value text.
	pub value: String,
}

impl FromStr for TraitArg {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let (predicate, value) = s
			.split_once('=')
			.ok_or_else(|| format!("expected PREDICATE=VALUE, got '{s}'"))?;
		let (predicate, value) = (predicate.trim(), value.trim());
		if predicate.is_empty() || value.is_empty() {
			return Err(format!("both sides of '{s}' must be non-empty"));
		}
		Ok(Self {
			predicate: predicate.to_string(),
			value: value.to_string(),
		})
	}
}

/// Vocabulary index selector.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
	/// Taxon classification
	Taxon,
	/// Trait predicates
	Predicate,
	/// Trait values
	Value,
}
