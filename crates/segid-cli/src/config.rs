use anyhow::bail;
use clap::{Parser, ValueEnum};
use segid::{IdTransform, MysqlConfig, Options};

/// Where high segments come from.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderKind {
    /// A process-local counter. Only unique within this process.
    Memory,
    /// A MySQL auto-increment column shared by every process.
    Mysql,
}

/// Runtime configuration for the `segid-cli` binary.
///
/// Every value is parsed from CLI arguments or environment variables (a `.env`
/// file is honoured). Layout values left unset fall back to the library
/// defaults.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "segid-cli",
    version,
    about = "Print unique 64-bit high/low segment IDs"
)]
pub struct CliArgs {
    /// Number of IDs to print.
    ///
    /// Environment variable: `COUNT`
    #[arg(short = 'n', long, env = "COUNT", default_value_t = 10)]
    pub count: u64,

    /// Tag carried in every log line of this generator.
    ///
    /// Environment variable: `GENERATOR_NAME`
    #[arg(long, env = "GENERATOR_NAME", default_value_t = String::from("default"))]
    pub name: String,

    /// Width of the section tag in the top bits (0 disables it).
    ///
    /// Environment variable: `SECTION_BITS`
    #[arg(long, env = "SECTION_BITS", default_value_t = 0)]
    pub section_bits: u32,

    /// Section tag value. Must fit in `--section-bits`.
    ///
    /// Environment variable: `SECTION`
    #[arg(long, env = "SECTION", default_value_t = 0)]
    pub section: u64,

    /// Width of the low segment.
    ///
    /// Environment variable: `LOW_BITS`
    #[arg(long, env = "LOW_BITS", default_value_t = segid::DEFAULT_LOW_BITS)]
    pub low_bits: u32,

    /// Distance between renewal boundaries. Must be a power of two.
    ///
    /// Environment variable: `RENEW_INTERVAL`
    #[arg(long, env = "RENEW_INTERVAL")]
    pub renew_interval: Option<u64>,

    /// Keep bit 63 clear so every ID fits a signed 64-bit integer.
    ///
    /// Environment variable: `SIGNED`
    #[arg(long, env = "SIGNED", default_value_t = false)]
    pub signed: bool,

    /// Backend that hands out high segments.
    ///
    /// Environment variable: `LOADER`
    #[arg(long, env = "LOADER", value_enum, default_value_t = LoaderKind::Memory)]
    pub loader: LoaderKind,

    /// Last value the memory loader pretends to have handed out.
    ///
    /// Environment variable: `MEMORY_START`
    #[arg(long, env = "MEMORY_START", default_value_t = 0)]
    pub memory_start: u64,

    /// MySQL `host:port`.
    ///
    /// Environment variable: `MYSQL_ADDR`
    #[arg(long, env = "MYSQL_ADDR", default_value_t = String::from("127.0.0.1:3306"))]
    pub mysql_addr: String,

    /// Environment variable: `MYSQL_USER`
    #[arg(long, env = "MYSQL_USER", default_value_t = String::from("root"))]
    pub mysql_user: String,

    /// Environment variable: `MYSQL_PASSWORD`
    #[arg(long, env = "MYSQL_PASSWORD", default_value_t = String::new(), hide_env_values = true)]
    pub mysql_password: String,

    /// Environment variable: `MYSQL_DATABASE`
    #[arg(long, env = "MYSQL_DATABASE", default_value_t = String::from("test"))]
    pub mysql_database: String,

    /// Table holding the auto-increment counter.
    ///
    /// Environment variable: `MYSQL_TABLE`
    #[arg(long, env = "MYSQL_TABLE", default_value_t = String::from("segid"))]
    pub mysql_table: String,
}

#[derive(Debug, Clone)]
pub struct CliConfig {
    pub count: u64,
    pub options: Options,
    pub loader: LoaderKind,
    pub memory_start: u64,
    pub mysql: MysqlConfig,
}

impl TryFrom<CliArgs> for CliConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.count == 0 {
            bail!("COUNT must be greater than 0");
        }

        if args.section_bits == 0 && args.section != 0 {
            bail!(
                "SECTION ({}) requires SECTION_BITS to be set",
                args.section
            );
        }

        let mut options = Options::new()
            .with_name(args.name)
            .with_section(args.section_bits, args.section)
            .with_low_bits(args.low_bits);
        if let Some(interval) = args.renew_interval {
            options = options.with_renew_interval(interval);
        }
        if args.signed {
            options = options.with_transform(IdTransform::Signed63);
        }

        // Surface layout errors here rather than after connecting.
        options.layout()?;

        Ok(Self {
            count: args.count,
            options,
            loader: args.loader,
            memory_start: args.memory_start,
            mysql: MysqlConfig {
                addr: args.mysql_addr,
                user: args.mysql_user,
                password: args.mysql_password,
                database: args.mysql_database,
                table: args.mysql_table,
            },
        })
    }
}
