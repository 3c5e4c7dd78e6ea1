// src/config/builtin.rs

//! Default task table for the chapter-tracker project.
//!
//! Used when no task file exists at the default path, and written out by
//! `taskpad init`.

pub const BUILTIN_CONFIG: &str = r#"# Taskpad task file for chapter-tracker.

[task.build]
description = "Build the crate and its examples"
program = "cargo"
args = ["build", "--examples"]
output = { mode = "terminal" }

[task.check]
description = "Type-check the crate and its examples"
program = "cargo"
args = ["check", "-q", "--examples"]
output = { mode = "immediate", bang = true }

[task.compile]
description = "Quiet build, failing loudly"
program = "cargo"
args = ["build", "-q"]
output = { mode = "immediate", bang = true }

[task.run]
description = "Run chapter-tracker against the episodes links directory"
program = "cargo"
args = ["run", "--", "--linksdir", "episodes-links"]
env = { RUST_BACKTRACE = "1", RUST_LOG = "chapter_tracker=debug" }
output = { mode = "terminal" }

[task.test]
description = "Run the test suite"
program = "cargo"
args = ["test", "-q", "--package=chapter-tracker", "--", "--nocapture", "--quiet", "--test"]
env = { RUST_BACKTRACE = "1" }
output = { mode = "immediate" }

[task.go]
description = "Run a cargo example"
program = "cargo"
args = ["run", "-q", "--example", "{example}"]
env = { RUST_BACKTRACE = "1", RUST_LOG = "chapter_tracker=debug" }
output = { mode = "terminal", size = 40 }
params = [{ name = "example", provider = "cargo_example" }]

[task.add_migration]
description = "Create a new sqlx migration"
program = "sqlx"
args = ["migrate", "add", "{name}"]
env = { DATABASE_URL = "sqlite:chapter_tracker.db3" }
params = [{ name = "name" }]

[task.reset_db]
description = "Restore the database from its backup copy"
aliases = ["init"]
program = "cp"
args = ["chapter_tracker.db3.old", "chapter_tracker.db3"]
output = { mode = "immediate", bang = true }

[task.install]
description = "Run the install script"
program = "./install-script.sh"
output = { mode = "terminal" }
"#;
