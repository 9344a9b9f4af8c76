use clap::{Parser, Subcommand};
use endfgm_site::config::Config;
use endfgm_site::helper::content_helpers;
use endfgm_site::models::db_operations::{documents_db_operations, users_db_operations};
use endfgm_site::setup::db_setup;
use rusqlite::Connection;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "setup_cli", author, version, about = "A CLI for setting up and maintaining the site.", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the .env configuration file.
    #[arg(long, required = true, value_name = "FILE")]
    env_file: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    Storage {
        #[command(subcommand)]
        action: StorageAction,
    },
}

#[derive(Subcommand, Debug)]
enum DbAction {
    /// Create the databases. Pass `documents` or `accounts` to set up only one.
    Setup {
        db_type: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum AdminAction {
    Create {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    List,
    ChangePassword {
        #[arg(long)]
        email: String,
        #[arg(long)]
        new_password: String,
    },
    Delete {
        #[arg(long)]
        email: String,
    },
}

#[derive(Subcommand, Debug)]
enum StorageAction {
    /// Delete media files no document refers to.
    Sweep {
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = Config::from_env(&cli.env_file)
        .expect("FATAL: Failed to load or parse configuration.");

    env_logger::init_from_env(env_logger::Env::new().default_filter_or(&config.log_level));

    match &cli.command {
        Commands::Db { action } => match action {
            DbAction::Setup { db_type } => match db_type.as_deref() {
                Some("accounts") => setup_accounts_database(&config),
                Some("documents") => setup_documents_database(&config),
                Some(other) => eprintln!("❌ Error: Unknown database type '{}'. Use 'accounts' or 'documents'.", other),
                None => {
                    setup_accounts_database(&config);
                    setup_documents_database(&config);
                }
            },
        },
        Commands::Admin { action } => match action {
            AdminAction::Create { email, password } => create_admin(&config, email, password),
            AdminAction::List => list_admins(&config),
            AdminAction::ChangePassword { email, new_password } => change_admin_password(&config, email, new_password),
            AdminAction::Delete { email } => delete_admin(&config, email),
        },
        Commands::Storage { action } => match action {
            StorageAction::Sweep { dry_run } => sweep_storage(&config, *dry_run),
        },
    }
}

fn setup_accounts_database(config: &Config) {
    let db_path = config.accounts_db_path();
    if db_path.exists() {
        println!("ℹ️ Accounts database already exists at '{}'. Skipping creation.", db_path.display());
        return;
    }
    println!("\nSetting up accounts database at '{}'...", db_path.display());

    if let Some(parent_dir) = db_path.parent() {
        if let Err(e) = fs::create_dir_all(parent_dir) {
            eprintln!("❌ Error: Could not create database directory: {}", e);
            return;
        }
    }

    let mut conn = match Connection::open(&db_path) {
        Ok(conn) => conn,
        Err(e) => {
            eprintln!("❌ Error: Could not create accounts database file: {}", e);
            return;
        }
    };
    match db_setup::setup_accounts_db(&mut conn) {
        Ok(_) => println!("✅ Accounts database setup completed successfully."),
        Err(e) => eprintln!("❌ Error setting up accounts database: {}", e),
    }
}

fn setup_documents_database(config: &Config) {
    let db_path = config.documents_db_path();
    if db_path.exists() {
        println!("ℹ️ Documents database already exists at '{}'. Skipping creation.", db_path.display());
        return;
    }
    println!("\nSetting up documents database at '{}'...", db_path.display());

    if let Some(parent_dir) = db_path.parent() {
        if let Err(e) = fs::create_dir_all(parent_dir) {
            eprintln!("❌ Error: Could not create database directory: {}", e);
            return;
        }
    }

    let db = match documents_db_operations::open_documents_db(&db_path) {
        Ok(db) => db,
        Err(e) => {
            eprintln!("❌ Error: Failed to create documents database file: {}", e);
            return;
        }
    };
    match db_setup::setup_documents_db(&db) {
        Ok(_) => println!("✅ Documents database setup completed successfully."),
        Err(e) => eprintln!("❌ Error setting up documents database: {}", e),
    }
}

fn open_accounts(config: &Config) -> Option<Connection> {
    let db_path = config.accounts_db_path();
    if !db_path.exists() {
        eprintln!("❌ Error: Accounts database not found at '{}'. Please run `setup_cli db setup` first.", db_path.display());
        return None;
    }
    match Connection::open(&db_path) {
        Ok(conn) => Some(conn),
        Err(e) => {
            eprintln!("❌ Error opening accounts database: {}", e);
            None
        }
    }
}

fn create_admin(config: &Config, email: &str, password: &str) {
    let conn = match open_accounts(config) {
        Some(conn) => conn,
        None => return,
    };
    match users_db_operations::create_admin(&conn, email, password) {
        Ok(_) => println!("✅ Admin '{}' created successfully.", email.trim().to_lowercase()),
        Err(e) => eprintln!("❌ Error creating admin: {}. The email might already be registered.", e),
    }
}

fn list_admins(config: &Config) {
    let conn = match open_accounts(config) {
        Some(conn) => conn,
        None => return,
    };
    match users_db_operations::read_all_admins(&conn) {
        Ok(admins) => {
            println!("Listing administrators:");
            for admin in admins {
                let status = if admin.is_active { "active" } else { "suspended" };
                let last_login = admin.last_login_time.as_deref().unwrap_or("never");
                println!("- {} ({}, last login: {})", admin.email, status, last_login);
            }
        }
        Err(e) => eprintln!("❌ Error fetching admins: {}", e),
    }
}

fn change_admin_password(config: &Config, email: &str, new_password: &str) {
    let conn = match open_accounts(config) {
        Some(conn) => conn,
        None => return,
    };
    match users_db_operations::change_password(&conn, email, new_password) {
        Ok(0) => eprintln!("❌ Error: No admin with email '{}' found.", email),
        Ok(_) => println!("✅ Password for '{}' changed successfully.", email),
        Err(e) => eprintln!("❌ Error updating password: {}", e),
    }
}

fn delete_admin(config: &Config, email: &str) {
    let conn = match open_accounts(config) {
        Some(conn) => conn,
        None => return,
    };
    match users_db_operations::delete_admin(&conn, email) {
        Ok(0) => eprintln!("❌ Error: No admin with email '{}' found.", email),
        Ok(_) => println!("✅ Admin '{}' deleted.", email),
        Err(e) => eprintln!("❌ Error deleting admin: {}", e),
    }
}

fn sweep_storage(config: &Config, dry_run: bool) {
    let db = match documents_db_operations::open_documents_db(&config.documents_db_path()) {
        Ok(db) => db,
        Err(e) => {
            eprintln!("❌ Error opening documents database: {}", e);
            return;
        }
    };

    let orphans = match content_helpers::find_orphaned_files(&db, config.media_root()) {
        Ok(orphans) => orphans,
        Err(e) => {
            eprintln!("❌ Error reading stored documents: {}", e);
            return;
        }
    };

    if orphans.is_empty() {
        println!("✅ No orphaned files under '{}'.", config.media_path);
        return;
    }

    let mut removed = 0;
    for path in &orphans {
        if dry_run {
            println!("- would delete {}", path.display());
            continue;
        }
        match fs::remove_file(path) {
            Ok(()) => {
                println!("- deleted {}", path.display());
                removed += 1;
            }
            Err(e) => eprintln!("❌ Could not delete {}: {}", path.display(), e),
        }
    }

    if dry_run {
        println!("ℹ️ {} orphaned file(s) found. Run without --dry-run to delete them.", orphans.len());
    } else {
        println!("✅ Deleted {} of {} orphaned file(s).", removed, orphans.len());
    }
}
