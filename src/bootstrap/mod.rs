use anyhow::{Context, Result};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use tracing::info;
use uuid::Uuid;

use crate::members::Member;
use crate::security::password::hash_password;
use crate::shared::models::schema::members;
use crate::shared::utils::DbPool;

fn create_tables_ddl() -> &'static str {
    r#"
    CREATE TABLE IF NOT EXISTS members (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        role TEXT NOT NULL,
        email TEXT NOT NULL,
        contact TEXT NOT NULL,
        password_hash TEXT NOT NULL
    );

    CREATE UNIQUE INDEX IF NOT EXISTS idx_members_email ON members(email);

    CREATE TABLE IF NOT EXISTS clients (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        client_code TEXT NOT NULL,
        address TEXT,
        poc TEXT,
        phone TEXT,
        email TEXT
    );

    CREATE UNIQUE INDEX IF NOT EXISTS idx_clients_code ON clients(client_code);

    CREATE TABLE IF NOT EXISTS vendors (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        vendor_code TEXT NOT NULL,
        address TEXT,
        poc TEXT,
        phone TEXT,
        email TEXT,
        raw_materials TEXT
    );

    CREATE UNIQUE INDEX IF NOT EXISTS idx_vendors_code ON vendors(vendor_code);

    CREATE TABLE IF NOT EXISTS projects (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        quotation_no TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'Draft',
        poc_phone TEXT
    );

    CREATE UNIQUE INDEX IF NOT EXISTS idx_projects_quotation_no ON projects(quotation_no);

    CREATE TABLE IF NOT EXISTS estimations (
        id TEXT PRIMARY KEY,
        client_name TEXT NOT NULL,
        billing_address TEXT,
        ship_to_address TEXT,
        poc_name TEXT,
        poc_phone TEXT,
        poc_email TEXT,
        prepared_by TEXT,
        project_name TEXT NOT NULL,
        revision TEXT,
        proposal_no TEXT,
        proposal_date DATE,
        valid_till DATE
    );

    CREATE TABLE IF NOT EXISTS company (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        address TEXT,
        email TEXT,
        phone TEXT
    );
    "#
}

/// Create the six tables and their unique indexes when absent. Runs on every
/// start; existing tables are left untouched.
pub fn run_startup_migrations(pool: &DbPool) -> Result<()> {
    let mut conn = pool
        .get()
        .context("Failed to acquire connection for startup migration")?;
    conn.batch_execute(create_tables_ddl())
        .context("Failed to create tables")?;
    info!("Startup migration complete");
    Ok(())
}

/// Seed a login when ADMIN_EMAIL and ADMIN_PASSWORD are both set and no
/// member with that email exists yet. A fresh database is unusable for
/// /token without at least one member.
pub fn ensure_admin_member(pool: &DbPool) -> Result<()> {
    let (Ok(email), Ok(password)) = (
        std::env::var("ADMIN_EMAIL"),
        std::env::var("ADMIN_PASSWORD"),
    ) else {
        return Ok(());
    };

    let mut conn = pool.get().context("Failed to acquire connection")?;

    let existing: i64 = members::table
        .filter(members::email.eq(&email))
        .count()
        .get_result(&mut conn)
        .context("Failed to check for admin member")?;

    if existing == 0 {
        let member = Member {
            id: Uuid::new_v4(),
            name: std::env::var("ADMIN_NAME").unwrap_or_else(|_| "Admin".to_string()),
            role: "Admin".to_string(),
            email: email.clone(),
            contact: String::new(),
            password_hash: hash_password(&password)?,
        };
        diesel::insert_into(members::table)
            .values(&member)
            .execute(&mut conn)
            .context("Failed to create admin member")?;
        info!("Admin member created: {email}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ddl_covers_every_table() {
        let ddl = create_tables_ddl();
        for table in [
            "members",
            "clients",
            "vendors",
            "projects",
            "estimations",
            "company",
        ] {
            assert!(
                ddl.contains(&format!("CREATE TABLE IF NOT EXISTS {table}")),
                "missing DDL for {table}"
            );
        }
    }

    #[test]
    fn test_ddl_enforces_unique_keys() {
        let ddl = create_tables_ddl();
        assert!(ddl.contains("UNIQUE INDEX IF NOT EXISTS idx_members_email"));
        assert!(ddl.contains("UNIQUE INDEX IF NOT EXISTS idx_clients_code"));
        assert!(ddl.contains("UNIQUE INDEX IF NOT EXISTS idx_vendors_code"));
        assert!(ddl.contains("UNIQUE INDEX IF NOT EXISTS idx_projects_quotation_no"));
    }
}
