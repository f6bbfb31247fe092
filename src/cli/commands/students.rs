//! `krozek list-students` command

use miette::{IntoDiagnostic, Result};

use crate::cli::args::{GlobalOpts, OutputFormat};
use crate::cli::session::{run_with, Session};
use crate::core::roster;

pub fn run(global: &GlobalOpts) -> Result<()> {
    run_with(global, |session| execute(session).map(|_| ()))
}

/// Print every org member that is not whitelisted
pub fn execute(session: &mut Session<'_>) -> Result<Vec<String>> {
    let students = roster::fetch_students(session.forge, session.config).into_diagnostic()?;

    match session.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&students).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Auto => {
            if students.is_empty() {
                println!("No students found in {}.", session.config.org_name);
            }
            for student in &students {
                println!("Student: {}", student);
            }
        }
    }

    Ok(students)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::prompt::ScriptedPrompter;
    use crate::cli::session::testing;
    use crate::core::forge::memory::MemoryForge;
    use std::path::Path;

    #[test]
    fn test_lists_non_whitelisted_members() {
        let config = testing::config(Path::new("content"), Path::new("README.md"));
        let forge = MemoryForge::new().with_members(&["teacher", "alice", "bob"]);
        let mut prompter = ScriptedPrompter::new();
        let mut session = Session::new(&config, &forge, &mut prompter, OutputFormat::Auto);

        let students = execute(&mut session).unwrap();

        assert_eq!(students, vec!["alice", "bob"]);
        assert!(prompter.asked.is_empty());
    }

    #[test]
    fn test_json_output_with_no_students() {
        let config = testing::config(Path::new("content"), Path::new("README.md"));
        let forge = MemoryForge::new().with_members(&["teacher"]);
        let mut prompter = ScriptedPrompter::new();
        let mut session = Session::new(&config, &forge, &mut prompter, OutputFormat::Json);

        assert!(execute(&mut session).unwrap().is_empty());
    }
}
