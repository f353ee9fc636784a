use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};

use crate::loader::{LoadError, Loader};

/// Connection parameters for [`MysqlLoader`].
#[derive(Clone, Debug, Default)]
pub struct MysqlConfig {
    /// `host:port`
    pub addr: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub table: String,
}

/// Loads high segments from a MySQL auto-increment column.
///
/// The table is expected to look like:
///
/// ```sql
/// CREATE TABLE segid (
///     h INT NOT NULL AUTO_INCREMENT,
///     x TINYINT NOT NULL DEFAULT '0',
///     PRIMARY KEY (x),
///     UNIQUE KEY h (h)
/// ) ENGINE=InnoDB;
/// ```
///
/// Each load replaces the single row, which bumps `h`, and reads the new
/// value back through `LAST_INSERT_ID()`. The table never grows past one row.
///
/// The pool connects lazily and needs a Tokio runtime, so pair this loader
/// with [`TokioSpawner`] and construct it from inside the runtime.
///
/// [`TokioSpawner`]: crate::runtime::TokioSpawner
#[derive(Debug)]
pub struct MysqlLoader {
    pool: MySqlPool,
    statement: String,
}

impl MysqlLoader {
    /// Validates `config` and prepares a lazily connected pool.
    ///
    /// # Errors
    /// Returns [`LoadError::Config`] when a field is empty, the address is not
    /// `host:port`, or the table name is not a plain identifier.
    pub fn new(config: &MysqlConfig) -> Result<Self, LoadError> {
        let (host, port) = parse_addr(&config.addr)?;
        if config.user.is_empty() {
            return Err(LoadError::Config("user must not be empty".into()));
        }
        if config.database.is_empty() {
            return Err(LoadError::Config("database must not be empty".into()));
        }
        if !is_identifier(&config.table) {
            return Err(LoadError::Config(format!(
                "table name {:?} is not a plain identifier",
                config.table
            )));
        }

        let mut options = MySqlConnectOptions::new()
            .host(host)
            .port(port)
            .username(&config.user)
            .database(&config.database);
        if !config.password.is_empty() {
            options = options.password(&config.password);
        }

        let pool = MySqlPoolOptions::new()
            .max_connections(1)
            .connect_lazy_with(options);

        Ok(Self {
            pool,
            statement: format!("REPLACE INTO `{}` (x) VALUES (0)", config.table),
        })
    }
}

impl Loader for MysqlLoader {
    async fn load(&self) -> Result<u64, LoadError> {
        let result = sqlx::query(&self.statement).execute(&self.pool).await?;
        match result.last_insert_id() {
            0 => Err(LoadError::Unavailable),
            high => Ok(high),
        }
    }
}

impl From<sqlx::Error> for LoadError {
    fn from(err: sqlx::Error) -> Self {
        Self::Backend(err.to_string())
    }
}

fn parse_addr(addr: &str) -> Result<(&str, u16), LoadError> {
    let invalid = || LoadError::Config(format!("address {addr:?} is not host:port"));
    let (host, port) = addr.rsplit_once(':').ok_or_else(invalid)?;
    if host.is_empty() {
        return Err(invalid());
    }
    let port = port.parse::<u16>().map_err(|_| invalid())?;
    Ok((host, port))
}

fn is_identifier(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}
