use crate::models::AdminAccount;
use bcrypt::{hash, verify, BcryptError};
use chrono::Utc;
use rusqlite::{params, Connection, Error as RusqliteError};

fn bcrypt_to_rusqlite_error(e: BcryptError) -> RusqliteError {
    RusqliteError::ToSqlConversionFailure(Box::new(e))
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn create_admin(conn: &Connection, email: &str, password: &str) -> Result<(), RusqliteError> {
    let hashed_password = hash(password, bcrypt::DEFAULT_COST).map_err(bcrypt_to_rusqlite_error)?;
    conn.execute(
        "INSERT INTO admins (email, password_hash) VALUES (?1, ?2)",
        params![normalize_email(email), hashed_password],
    )?;
    Ok(())
}

pub fn read_all_admins(conn: &Connection) -> Result<Vec<AdminAccount>, RusqliteError> {
    let mut stmt = conn.prepare("SELECT id, email, is_active, last_login_time FROM admins ORDER BY id")?;
    let admin_iter = stmt.query_map([], |row| {
        Ok(AdminAccount {
            id: row.get(0)?,
            email: row.get(1)?,
            is_active: row.get(2)?,
            last_login_time: row.get(3)?,
        })
    })?;

    let admins = admin_iter.filter_map(|a| a.ok()).collect();
    Ok(admins)
}

pub fn read_admin_by_email(conn: &Connection, email: &str) -> Option<AdminAccount> {
    conn.query_row(
        "SELECT id, email, is_active, last_login_time FROM admins WHERE email = ?1",
        [normalize_email(email)],
        |row| {
            Ok(AdminAccount {
                id: row.get(0)?,
                email: row.get(1)?,
                is_active: row.get(2)?,
                last_login_time: row.get(3)?,
            })
        },
    ).ok()
}

/// Returns the normalized email of the account when the password matches an active account.
pub fn verify_credentials(conn: &Connection, email: &str, password: &str) -> Option<String> {
    let email = normalize_email(email);
    let res: rusqlite::Result<(String, bool)> = conn.query_row(
        "SELECT password_hash, is_active FROM admins WHERE email = ?1",
        [&email],
        |row| Ok((row.get(0)?, row.get(1)?)),
    );

    if let Ok((hash, is_active)) = res {
        if is_active && verify(password, &hash).unwrap_or(false) {
            return Some(email);
        }
    }
    None
}

pub fn update_last_login_time(conn: &Connection, email: &str) -> Result<(), RusqliteError> {
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "UPDATE admins SET last_login_time = ?1 WHERE email = ?2",
        params![now, normalize_email(email)],
    )?;
    Ok(())
}

pub fn change_password(conn: &Connection, email: &str, new_password: &str) -> Result<usize, RusqliteError> {
    let hashed_password = hash(new_password, bcrypt::DEFAULT_COST).map_err(bcrypt_to_rusqlite_error)?;
    conn.execute(
        "UPDATE admins SET password_hash = ?1 WHERE email = ?2",
        params![hashed_password, normalize_email(email)],
    )
}

pub fn delete_admin(conn: &Connection, email: &str) -> Result<usize, RusqliteError> {
    conn.execute("DELETE FROM admins WHERE email = ?1", [normalize_email(email)])
}
