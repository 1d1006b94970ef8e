//! inlinekv CLI Client
//!
//! Command-line interface for issuing single commands to a server.

use bytes::Bytes;
use clap::{Parser, Subcommand};
use inlinekv::{Client, ClientConfig, Command, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// inlinekv CLI
#[derive(Parser, Debug)]
#[command(name = "inlinekv-cli")]
#[command(about = "CLI for inline-command key-value servers")]
#[command(version)]
struct Args {
    /// Server host
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Server port
    #[arg(short, long, default_value = "6379")]
    port: u16,

    /// Password sent with AUTH after connecting
    #[arg(short = 'a', long)]
    password: Option<String>,

    /// Connect/read/write timeout in milliseconds (0 = none)
    #[arg(short, long, default_value = "0")]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Set a field in a hash
    Hset {
        /// The hash key
        key: String,

        /// The field to set
        field: String,

        /// The value to set
        value: String,
    },

    /// Get a field from a hash
    Hget {
        /// The hash key
        key: String,

        /// The field to get
        field: String,
    },

    /// Set several hash fields: FIELD VALUE [FIELD VALUE ...]
    Hmset {
        /// The hash key
        key: String,

        /// Alternating fields and values
        #[arg(required = true, num_args = 2..)]
        pairs: Vec<String>,
    },

    /// Get several hash fields
    Hmget {
        /// The hash key
        key: String,

        /// The fields to get, in order
        #[arg(required = true)]
        fields: Vec<String>,
    },

    /// Set a value and print the previous one
    Getset {
        /// The key to set
        key: String,

        /// The new value
        value: String,
    },

    /// Delete a key
    Del {
        /// The key to delete
        key: String,
    },

    /// Synchronously save the dataset
    Save,

    /// Save the dataset in the background
    Bgsave,

    /// Send any inline command and print the raw reply
    Raw {
        /// The command name
        name: String,

        /// The command arguments
        args: Vec<String>,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,inlinekv=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut builder = ClientConfig::builder()
        .host(&args.host)
        .port(args.port)
        .connect_timeout_ms(args.timeout_ms)
        .read_timeout_ms(args.timeout_ms)
        .write_timeout_ms(args.timeout_ms);
    if let Some(password) = &args.password {
        builder = builder.password(password);
    }
    let config = builder.build();

    tracing::debug!("inlinekv CLI v{} -> {}", inlinekv::VERSION, config.addr());

    if let Err(e) = run(config, args.command) {
        tracing::debug!("Command failed: {:?}", e);
        eprintln!("(error) {}", e);
        std::process::exit(1);
    }
}

fn run(config: ClientConfig, command: Commands) -> Result<()> {
    let mut client = Client::connect(config)?;

    match command {
        Commands::Get { key } => print_value(client.get(&key)?),
        Commands::Set { key, value } => {
            client.set(&key, &value)?;
            println!("OK");
        }
        Commands::Hset { key, field, value } => {
            println!("(integer) {}", client.hset(&key, &field, &value)?);
        }
        Commands::Hget { key, field } => print_value(client.hget(&key, &field)?),
        Commands::Hmset { key, pairs } => {
            let fields: Vec<&str> = pairs.iter().step_by(2).map(String::as_str).collect();
            let values: Vec<&str> = pairs.iter().skip(1).step_by(2).map(String::as_str).collect();
            client.hmset(&key, &fields, &values)?;
            println!("OK");
        }
        Commands::Hmget { key, fields } => {
            for (idx, value) in client.hmget(&key, &fields)?.into_iter().enumerate() {
                print!("{}) ", idx + 1);
                print_value(value);
            }
        }
        Commands::Getset { key, value } => print_value(client.getset(&key, &value)?),
        Commands::Del { key } => println!("(integer) {}", client.del(&key)?),
        Commands::Save => {
            client.save()?;
            println!("OK");
        }
        Commands::Bgsave => println!("{}", client.bgsave()?),
        Commands::Raw { name, args } => {
            println!("{}", client.call(&Command::new(name).args(args))?);
        }
    }

    client.close();
    Ok(())
}

fn print_value(value: Option<Bytes>) {
    match value {
        Some(data) => println!("\"{}\"", String::from_utf8_lossy(&data)),
        None => println!("(nil)"),
    }
}
