//! Athenaeum command-line entry point.
//!
//! # Responsibility
//! - Receive input, call core use-cases, render results as JSON.
//! - Keep validation failures (exit 2) apart from storage failures (exit 1).

mod cli;

use athenaeum_core::db::{open_db, open_db_in_memory};
use athenaeum_core::{
    default_log_level, init_logging, AthenaeumInput, CourseInput, FieldError, GoalInput,
    ResourceKind, ResourceService, ServiceError, ServiceResult, SqliteRecordStore,
};
use clap::Parser;
use cli::{Cli, Command};
use log::error;
use serde_json::{json, Value};
use std::process::ExitCode;

const EXIT_FAILURE: u8 = 1;
const EXIT_INVALID_INPUT: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level: &str = cli.log_level.as_deref().unwrap_or_else(|| default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("athenaeum: {err}");
            return ExitCode::from(EXIT_FAILURE);
        }
    }

    let opened = if cli.memory {
        open_db_in_memory()
    } else {
        open_db(&cli.db)
    };
    let conn = match opened {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("athenaeum: cannot open database `{}`: {err}", cli.db.display());
            return ExitCode::from(EXIT_FAILURE);
        }
    };
    let store = match SqliteRecordStore::try_new(&conn) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("athenaeum: {err}");
            return ExitCode::from(EXIT_FAILURE);
        }
    };
    let service = ResourceService::new(store);

    match run(&service, cli.command) {
        Ok(value) => {
            println!("{value:#}");
            ExitCode::SUCCESS
        }
        Err(ServiceError::Invalid(errors)) => {
            println!("{:#}", errors_body(&errors));
            ExitCode::from(EXIT_INVALID_INPUT)
        }
        Err(err) => {
            error!("event=cli_command module=cli status=error error={err}");
            eprintln!("athenaeum: {err}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn run(
    service: &ResourceService<SqliteRecordStore<'_>>,
    command: Command,
) -> ServiceResult<Value> {
    let body = match command {
        Command::CreateGoal { name } => {
            let goal = service.create_goal(&GoalInput { name })?;
            json!({ "goal": goal })
        }
        Command::CreateCourse { name, goals } => {
            let course = service.create_course(&CourseInput { name, goals })?;
            json!({ "course": course })
        }
        Command::CreateAthenaeum { name, courses } => {
            let athenaeum = service.create_athenaeum(&AthenaeumInput { name, courses })?;
            json!({ "athenaeum": athenaeum })
        }
        Command::Get { kind, id } => match ResourceKind::from(kind) {
            ResourceKind::Goal => {
                let goal = service.get_goal(id)?;
                json!({ "goal": goal })
            }
            ResourceKind::Course => {
                let course = service.get_course(id)?;
                json!({ "course": course })
            }
            ResourceKind::Athenaeum => {
                let athenaeum = service.get_athenaeum(id)?;
                json!({ "athenaeum": athenaeum })
            }
        },
        Command::List { kind } => match ResourceKind::from(kind) {
            ResourceKind::Goal => {
                let goals = service.list_goals()?;
                json!({ "goals": goals })
            }
            ResourceKind::Course => {
                let courses = service.list_courses()?;
                json!({ "courses": courses })
            }
            ResourceKind::Athenaeum => {
                let athenaeums = service.list_athenaeums()?;
                json!({ "athenaeums": athenaeums })
            }
        },
    };
    Ok(body)
}

fn errors_body(errors: &[FieldError]) -> Value {
    let views: Vec<_> = errors.iter().map(FieldError::to_view).collect();
    json!({ "errors": views })
}

#[cfg(test)]
mod tests {
    use super::{errors_body, run};
    use crate::cli::{Command, KindArg};
    use athenaeum_core::db::open_db_in_memory;
    use athenaeum_core::{ResourceService, SqliteRecordStore};
    use serde_json::json;

    #[test]
    fn create_then_conflict_renders_caller_contract() {
        let conn = open_db_in_memory().unwrap();
        let service = ResourceService::new(SqliteRecordStore::try_new(&conn).unwrap());
        let course = run(
            &service,
            Command::CreateCourse {
                name: "Algebra I".to_string(),
                goals: Vec::new(),
            },
        )
        .unwrap();
        let course_id = course["course"]["id"].clone();

        let created = run(
            &service,
            Command::CreateAthenaeum {
                name: "Downtown Library".to_string(),
                courses: vec!["Algebra I".to_string(), "Unknown Course".to_string()],
            },
        )
        .unwrap();
        assert_eq!(created["athenaeum"]["name"], "Downtown Library");
        assert_eq!(created["athenaeum"]["courses"], json!([course_id]));

        let err = run(
            &service,
            Command::CreateAthenaeum {
                name: "Downtown Library".to_string(),
                courses: Vec::new(),
            },
        )
        .unwrap_err();
        let body = errors_body(err.field_errors().unwrap());
        assert_eq!(
            body,
            json!({
                "errors": [{ "field": "name", "message": "Downtown Library already exists" }]
            })
        );
    }

    #[test]
    fn list_renders_plural_key() {
        let conn = open_db_in_memory().unwrap();
        let service = ResourceService::new(SqliteRecordStore::try_new(&conn).unwrap());

        let body = run(
            &service,
            Command::List {
                kind: KindArg::Athenaeum,
            },
        )
        .unwrap();
        assert_eq!(body, json!({ "athenaeums": [] }));
    }
}
