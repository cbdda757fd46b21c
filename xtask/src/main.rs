// Copyright (C) 2024-2025 Fred Clausen and the ratatui project contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask - Project Automation
//!
//! Developer commands for the workspace: build, lint, test and the
//! draft-store migration check.
//!
//! - `cargo xtask ci` runs lint, dependency checks, build, tests and
//!   migration verification
//! - `cargo xtask verify-migrations` applies the embedded `SQLite`
//!   migrations to a scratch database, compares the result with the
//!   tables the persistence crate maps, then reverts them
//!
//! The remaining commands wrap cargo and the usual tools over the whole
//! workspace:
//!
//! - `build`, `check`, `test`, `test-libs`, `test-docs` run the matching
//!   cargo command with all features
//! - `lint` runs `lint-clippy` (`-D warnings`), `lint-docs` (nightly
//!   rustdoc per default member with `--cfg docsrs -D warnings`),
//!   `lint-formatting` (nightly `cargo fmt --check`) and `lint-typos`
//! - `fix-*` apply nightly `cargo fmt`, `typos -w` and `clippy --fix`
//! - `deny` and `machete` check licences, advisories and unused dependencies
//!
//! Every check runs against an in-memory database; nothing needs Docker
//! or a running service.

#![deny(
    clippy::pedantic,
    //clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::{fmt::Debug, io, process::Output, vec};

use cargo_metadata::MetadataCommand;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{eyre::Context, Result};
use diesel::sql_types::{Integer, Text};
use diesel::{QueryableByName, RunQueryDsl, SqliteConnection};
use duct::cmd;
use std::collections::{BTreeMap, BTreeSet};
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    match args.run() {
        Ok(()) => (),
        Err(err) => {
            tracing::error!("{err}");
            std::process::exit(1);
        }
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask", styles = clap_cargo::style::CLAP_STYLING)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn run(self) -> Result<()> {
        self.command.run()
    }

    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Run CI checks (lint, build, test, migrations)
    CI,

    /// Build the project
    #[command(visible_alias = "b")]
    Build,

    /// Run cargo check
    #[command(visible_alias = "c")]
    Check,

    /// Check dependencies
    #[command(visible_alias = "cd")]
    Deny,

    /// Check unused dependencies
    #[command(visible_alias = "m")]
    Machete,

    /// Lint formatting, typos, clippy, and docs
    #[command(visible_alias = "l")]
    Lint,

    /// Run clippy on the project
    #[command(visible_alias = "cl")]
    LintClippy,

    /// Check documentation for errors and warnings
    #[command(visible_alias = "d")]
    LintDocs,

    /// Check for formatting issues in the project
    #[command(visible_alias = "lf")]
    LintFormatting,

    /// Check for typos in the project
    #[command(visible_alias = "lt")]
    LintTypos,

    /// Fix clippy warnings in the project
    #[command(visible_alias = "fc")]
    FixClippy,

    /// Fix formatting issues in the project
    #[command(visible_alias = "fmt")]
    FixFormatting,

    /// Fix typos in the project
    #[command(visible_alias = "typos")]
    FixTypos,

    /// Run tests
    #[command(visible_alias = "t")]
    Test,

    /// Run doc tests
    #[command(visible_alias = "td")]
    TestDocs,

    /// Run lib tests
    #[command(visible_alias = "tl")]
    TestLibs,

    /// Check the draft-store migrations against the mapped tables
    #[command(visible_alias = "vm")]
    VerifyMigrations,
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => ci(),
            Self::Build => build(),
            Self::Check => check(),
            Self::Deny => deny(),
            Self::Machete => machete(),
            Self::Lint => lint(),
            Self::LintClippy => lint_clippy(),
            Self::LintDocs => lint_docs(),
            Self::LintFormatting => lint_format(),
            Self::LintTypos => lint_typos(),
            Self::FixClippy => fix_clippy(),
            Self::FixFormatting => fix_format(),
            Self::FixTypos => fix_typos(),
            Self::Test => test(),
            Self::TestDocs => test_docs(),
            Self::TestLibs => test_libs(),
            Self::VerifyMigrations => verify_migrations(),
        }
    }
}

/// Run CI checks (lint, build, test)
fn ci() -> Result<()> {
    lint()?;
    deny()?;
    machete()?;
    build()?;
    test()?;
    verify_migrations()?;
    Ok(())
}

fn deny() -> Result<()> {
    run_cargo(vec!["deny", "check"])
}

fn machete() -> Result<()> {
    cmd!("cargo-machete").run_with_trace()?;
    Ok(())
}

/// Build the project
fn build() -> Result<()> {
    run_cargo(vec!["build", "--all-targets", "--all-features"])
}

/// Run cargo check
fn check() -> Result<()> {
    run_cargo(vec!["check", "--all-targets", "--all-features"])
}

/// Lint formatting, typos, clippy, and docs
fn lint() -> Result<()> {
    lint_clippy()?;
    lint_docs()?;
    lint_format()?;
    lint_typos()?;
    Ok(())
}

/// Run clippy on the project
fn lint_clippy() -> Result<()> {
    run_cargo(vec![
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ])
}

/// Fix clippy warnings in the project
fn fix_clippy() -> Result<()> {
    run_cargo(vec![
        "clippy",
        "--all-targets",
        "--all-features",
        "--fix",
        "--allow-dirty",
        "--allow-staged",
        "--",
        "-D",
        "warnings",
    ])
}

/// Check that docs build without errors using docs.rs-equivalent flags
fn lint_docs() -> Result<()> {
    let meta = MetadataCommand::new()
        .exec()
        .wrap_err("failed to get cargo metadata")?;

    for package in meta.workspace_default_packages() {
        cmd(
            "cargo",
            [
                "doc",
                "--no-deps",
                "--all-features",
                "--package",
                &package.name,
            ],
        )
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .env("RUSTDOCFLAGS", "--cfg docsrs -D warnings")
        .run_with_trace()?;
    }

    Ok(())
}

/// Lint formatting issues in the project
fn lint_format() -> Result<()> {
    run_cargo_nightly(vec!["fmt", "--all", "--check"])
}

/// Fix formatting issues in the project
fn fix_format() -> Result<()> {
    run_cargo_nightly(vec!["fmt", "--all"])
}

/// Check for typos in the project using [typos-cli](https://github.com/crate-ci/typos/)
fn lint_typos() -> Result<()> {
    cmd!("typos").run_with_trace()?;
    Ok(())
}

/// Fix typos in the project
fn fix_typos() -> Result<()> {
    cmd!("typos", "-w").run_with_trace()?;
    Ok(())
}

/// Run tests for libs and docs
fn test() -> Result<()> {
    test_libs()?;
    test_docs()?; // run last because it's slow
    Ok(())
}

/// Run doc tests for the workspace's default packages
fn test_docs() -> Result<()> {
    run_cargo(vec!["test", "--doc", "--all-features"])
}

/// Run lib tests for the workspace's default packages
fn test_libs() -> Result<()> {
    run_cargo(vec!["test", "--all-targets", "--all-features"])
}

/// Run a cargo subcommand with the default toolchain
fn run_cargo(args: Vec<&str>) -> Result<()> {
    cmd("cargo", args).run_with_trace()?;
    Ok(())
}

/// Run a cargo subcommand with the nightly toolchain
fn run_cargo_nightly(args: Vec<&str>) -> Result<()> {
    cmd("cargo", args)
        // CARGO env var is set because we're running in a cargo subcommand
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .run_with_trace()?;
    Ok(())
}

/// Verify the draft-store migrations
///
/// ## What This Command Does
///
/// 1. Applies the embedded `SQLite` migrations to an in-memory database
/// 2. Introspects the resulting schema (tables, columns, types, keys)
/// 3. Compares it with the tables `diesel_schema.rs` maps
/// 4. Reverts every migration and checks no table is left behind
///
/// ## Usage
///
/// ```bash
/// cargo xtask verify-migrations
/// ```
///
/// ## Failures
///
/// The command fails if:
/// - Migrations fail to apply or revert
/// - A table, column, type, nullability or primary key differs
/// - A table survives the revert
fn verify_migrations() -> Result<()> {
    use diesel::Connection;
    use diesel_migrations::{embed_migrations, MigrationHarness};

    #[allow(clippy::items_after_statements)]
    const SQLITE_MIGRATIONS: diesel_migrations::EmbeddedMigrations =
        embed_migrations!("../crates/persistence/migrations");

    tracing::info!("Starting draft-store migration verification");

    let mut conn = SqliteConnection::establish(":memory:")
        .wrap_err("Failed to create SQLite in-memory database")?;

    conn.run_pending_migrations(SQLITE_MIGRATIONS)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to apply SQLite migrations: {}", e))?;
    tracing::info!("SQLite migrations applied successfully");

    let migrated = introspect_sqlite_schema(&mut conn)?;
    compare_schemas(&mapped_schema(), &migrated)?;
    tracing::info!("Migrated schema matches the mapped tables");

    conn.revert_all_migrations(SQLITE_MIGRATIONS)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to revert SQLite migrations: {}", e))?;

    let reverted = introspect_sqlite_schema(&mut conn)?;
    if !reverted.tables.is_empty() {
        return Err(color_eyre::eyre::eyre!(
            "❌ Migration check FAILED: tables left after revert: {:?}",
            reverted.tables.keys().collect::<Vec<_>>()
        ));
    }

    tracing::info!("✓ Migration verification passed");
    Ok(())
}

/// Normalized schema representation
#[derive(Debug, Clone, PartialEq, Eq)]
struct Schema {
    tables: BTreeMap<String, Table>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Table {
    columns: BTreeMap<String, Column>,
    primary_keys: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Column {
    normalized_type: String,
    nullable: bool,
}

/// The tables the persistence crate's `table!` definitions map.
fn mapped_schema() -> Schema {
    let columns: BTreeMap<String, Column> = [
        ("draft_key", "text"),
        ("form_kind", "text"),
        ("payload_json", "text"),
        ("writer", "text"),
        ("sequence", "bigint"),
        ("saved_at", "text"),
    ]
    .into_iter()
    .map(|(name, normalized_type)| {
        (
            name.to_string(),
            Column {
                normalized_type: normalized_type.to_string(),
                nullable: false,
            },
        )
    })
    .collect();

    let tables = BTreeMap::from([(
        String::from("form_drafts"),
        Table {
            columns,
            primary_keys: BTreeSet::from([String::from("draft_key")]),
        },
    )]);
    Schema { tables }
}

/// Introspect `SQLite` schema
fn introspect_sqlite_schema(conn: &mut SqliteConnection) -> Result<Schema> {
    #[derive(QueryableByName)]
    struct TableName {
        #[diesel(sql_type = Text)]
        name: String,
    }

    #[derive(QueryableByName)]
    struct ColumnInfo {
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Text)]
        r#type: String,
        #[diesel(sql_type = Integer)]
        notnull: i32,
        #[diesel(sql_type = Integer)]
        pk: i32,
    }

    let mut schema = Schema {
        tables: BTreeMap::new(),
    };

    // Get all tables
    let tables: Vec<TableName> = diesel::sql_query(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name != '__diesel_schema_migrations' ORDER BY name"
    )
    .load(conn)
    .wrap_err("Failed to query SQLite tables")?;

    for table in tables {
        let mut table_info = Table {
            columns: BTreeMap::new(),
            primary_keys: BTreeSet::new(),
        };

        let columns: Vec<ColumnInfo> =
            diesel::sql_query(format!("PRAGMA table_info({})", table.name))
                .load(conn)
                .wrap_err(format!("Failed to get columns for table {}", table.name))?;

        for col in columns {
            table_info.columns.insert(
                col.name.clone(),
                Column {
                    normalized_type: normalize_sqlite_type(&col.r#type),
                    nullable: col.notnull == 0,
                },
            );

            if col.pk > 0 {
                table_info.primary_keys.insert(col.name);
            }
        }

        schema.tables.insert(table.name, table_info);
    }

    Ok(schema)
}

/// Map `SQLite` declared types onto the names used in `mapped_schema`
fn normalize_sqlite_type(sqlite_type: &str) -> String {
    let upper = sqlite_type.to_uppercase();
    if upper.contains("BIGINT") {
        String::from("bigint")
    } else if upper.contains("INT") {
        String::from("integer")
    } else if upper.contains("CHAR") || upper.contains("TEXT") || upper.contains("CLOB") {
        String::from("text")
    } else {
        upper.to_lowercase()
    }
}

/// Compare the mapped tables with what the migrations produced
fn compare_schemas(mapped: &Schema, migrated: &Schema) -> Result<()> {
    let mapped_tables: BTreeSet<_> = mapped.tables.keys().collect();
    let migrated_tables: BTreeSet<_> = migrated.tables.keys().collect();

    if mapped_tables != migrated_tables {
        return Err(color_eyre::eyre::eyre!(
            "❌ Migration check FAILED: Table mismatch\n  Mapped: {:?}\n  Migrated: {:?}",
            mapped_tables,
            migrated_tables
        ));
    }

    for (table_name, mapped_table) in &mapped.tables {
        let migrated_table = &migrated.tables[table_name];

        let mapped_columns: BTreeSet<_> = mapped_table.columns.keys().collect();
        let migrated_columns: BTreeSet<_> = migrated_table.columns.keys().collect();

        if mapped_columns != migrated_columns {
            let mut errors = Vec::new();

            for col in mapped_columns.difference(&migrated_columns) {
                errors.push(format!("    - Column '{col}' is mapped but not migrated"));
            }

            for col in migrated_columns.difference(&mapped_columns) {
                errors.push(format!("    - Column '{col}' is migrated but not mapped"));
            }

            return Err(color_eyre::eyre::eyre!(
                "❌ Migration check FAILED: Column mismatch in table '{}'\n{}",
                table_name,
                errors.join("\n")
            ));
        }

        // Check column types and nullability
        for col_name in mapped_columns {
            let mapped_col = &mapped_table.columns[col_name];
            let migrated_col = &migrated_table.columns[col_name];

            if mapped_col != migrated_col {
                return Err(color_eyre::eyre::eyre!(
                    "❌ Migration check FAILED: Column '{}' in table '{}' differs\n  Mapped: {:?}\n  Migrated: {:?}",
                    col_name,
                    table_name,
                    mapped_col,
                    migrated_col
                ));
            }
        }

        if mapped_table.primary_keys != migrated_table.primary_keys {
            return Err(color_eyre::eyre::eyre!(
                "❌ Migration check FAILED: Primary key mismatch in table '{}'\n  Mapped: {:?}\n  Migrated: {:?}",
                table_name,
                mapped_table.primary_keys,
                migrated_table.primary_keys
            ));
        }
    }

    Ok(())
}

/// An extension trait for `duct::Expression` that logs the command being run
/// before running it.
trait ExpressionExt {
    /// Run the command and log the command being run
    fn run_with_trace(&self) -> io::Result<Output>;
}

impl ExpressionExt for duct::Expression {
    fn run_with_trace(&self) -> io::Result<Output> {
        tracing::info!("running command: {:?}", self);
        self.run().inspect_err(|_| {
            // The command that was run may have scrolled off the screen, so repeat it here
            tracing::error!("failed to run command: {:?}", self);
        })
    }
}
