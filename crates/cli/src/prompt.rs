//! Terminal prompts.

use std::io::{self, BufRead, Write};

/// Asks on stderr and reads one line from stdin. Input is echoed.
pub fn read_line(prompt: &str) -> io::Result<String> {
	let mut stderr = io::stderr();
	write!(stderr, "{prompt}")?;
	stderr.flush()?;

	let mut line = String::new();
	io::stdin().lock().read_line(&mut line)?;
	Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Asks a yes/no question. `y` or `yes` confirms; anything else, including a
/// read error, declines.
pub fn confirm(prompt: &str) -> bool {
	read_line(&format!("{prompt} [y/N] "))
		.map(|answer| matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
		.unwrap_or(false)
}
