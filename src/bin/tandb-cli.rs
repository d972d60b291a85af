//! tandb CLI Client
//!
//! Interactive command-line client speaking the line protocol.

use anyhow::Context;
use clap::Parser;
use futures::{SinkExt, StreamExt};
use std::io::{self, Write};
use tandb::{Command, LineCodec, Response};
use tokio::net::TcpStream;
use tokio_util::codec::Framed;

/// tandb CLI - Interactive Client
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Server host
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Server port
    #[arg(short, long, default_value_t = 6380)]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let addr = format!("{}:{}", args.host, args.port);

    println!("Connecting to tandb at {}...", addr);

    let stream = TcpStream::connect(&addr)
        .await
        .with_context(|| format!("failed to connect to {}", addr))?;
    let mut framed = Framed::new(stream, LineCodec::default());

    println!("Connected! Type 'help' for available commands, 'quit' to exit.\n");

    loop {
        print!("tandb> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("exit") {
            println!("Goodbye!");
            break;
        }

        if input.eq_ignore_ascii_case("help") {
            print_help();
            continue;
        }

        // validate locally so typos never reach the server
        if let Err(e) = Command::parse(input) {
            eprintln!("Error: {}", e);
            continue;
        }

        framed.send(input.to_string()).await?;

        let Some(first) = framed.next().await.transpose()? else {
            eprintln!("Connection closed by server");
            break;
        };
        println!("{}", first);

        for _ in 0..Response::array_len(&first).unwrap_or(0) {
            match framed.next().await.transpose()? {
                Some(line) => println!("{}", line),
                None => anyhow::bail!("connection closed mid-response"),
            }
        }
    }

    Ok(())
}

fn print_help() {
    println!(
        r#"
Available commands:

  PING                          - Check server connectivity
  SET <key> <value>             - Store a persistent value
  SETEX <key> <value> <secs>    - Store a value expiring after <secs> (-1 = never)
  GET <key> | DEL <key> | EXISTS <key>
  MGET <key> [key ...]          - Fetch several values
  EXPIRE <key> <secs>           - Change the lifetime, counted from creation
  PERSIST <key>                 - Remove the expiration
  TTL <key> | EXPIRETIME <key>  - Remaining seconds / unix expiry (-1 = never)
  KEYS                          - List all keys

  SADD <set> <elem> [elem ...]  | SREM <set> <elem>
  SCARD <set> | SMEMBERS <set>  | SISMEMBER <set> <elem>
  SDIFF | SINTER | SUNION <a> <b>
  SDIFFSTORE | SINTERSTORE <a> <b> <dest>

  ZADD, ZREM, ZCARD, ZMEMBERS, ZISMEMBER, ZDIFF, ZINTER, ZUNION,
  ZDIFFSTORE, ZINTERSTORE       - Same as above, members kept sorted

  help              - Show this help
  quit / exit       - Exit the CLI
"#
    );
}
