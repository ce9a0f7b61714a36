/*!
# SQLChain Command Line Interface

A binary for managing your node and looking at wallets through the node's
network interface.

## Usage

```bash
sqlchaincli help [subcommand]
```

## Available subcommands

**state** - prints the state of the node

**nodes** - lists the nodes the node knows

**addnode**, **removenode** - edit the node list, need `auth_token`

**balance**, **history**, **unspent** - wallet info of an address

**stop** - sends the void command the node listens for when stopping

## Configuration

Settings are read from the file given with `--config` (default `config`,
the file may be missing) and from `SQLCHAIN_*` environment variables, e.g.

```bash
SQLCHAIN_NODE_PORT=8767 SQLCHAIN_AUTH_TOKEN=adminsecret \
    sqlchaincli addnode --host 10.0.0.7 --port 8766
```

## Dev

```bash
cargo run --bin sqlchaincli -- balance --address 1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN2
```
*/
use clap::{App, Arg, ArgMatches};
use sqlchain_rust::{
    networking::{client::NodeClient, peer::NodeAddr},
    settings::ClientSettings,
};
use tracing::{event, Level};

fn address_arg<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name("address")
        .short("a")
        .long("address")
        .required(true)
        .takes_value(true)
        .help("wallet address")
}

fn node_args<'a, 'b>(app: App<'a, 'b>) -> App<'a, 'b> {
    app.arg(
        Arg::with_name("host")
            .long("host")
            .required(true)
            .takes_value(true)
            .help("host of the node"),
    )
    .arg(
        Arg::with_name("port")
            .short("p")
            .long("port")
            .required(true)
            .takes_value(true)
            .help("port of the node"),
    )
}

fn node_from_matches(matches: &ArgMatches) -> sqlchain_rust::Result<NodeAddr> {
    let host = matches.value_of("host").ok_or("missing host")?;
    let port = matches.value_of("port").ok_or("missing port")?.parse()?;
    let node = NodeAddr::new(host, port);
    node.validate()?;
    Ok(node)
}

fn address_from_matches<'a>(matches: &'a ArgMatches) -> sqlchain_rust::Result<&'a str> {
    Ok(matches.value_of("address").ok_or("missing address")?)
}

#[tokio::main]
pub async fn main() -> sqlchain_rust::Result<()> {
    tracing_subscriber::fmt::init();

    let command_matches = App::new("SQLChain Command Line Interface")
        .about("Manage your node and check wallets through the node")
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .takes_value(true)
                .default_value("config")
                .help("config file name"),
        )
        .subcommand(App::new("state").about("prints the state of the node"))
        .subcommand(App::new("nodes").about("lists known nodes"))
        .subcommand(node_args(App::new("addnode").about("adds a node to the node list")))
        .subcommand(node_args(
            App::new("removenode").about("removes a node from the node list"),
        ))
        .subcommand(
            App::new("balance")
                .about("prints the balance of an address")
                .arg(address_arg()),
        )
        .subcommand(
            App::new("history")
                .about("prints the transactions of an address")
                .arg(address_arg()),
        )
        .subcommand(
            App::new("unspent")
                .about("prints unspent outputs of an address")
                .arg(address_arg()),
        )
        .subcommand(App::new("stop").about("asks the node to stop listening"))
        .get_matches();

    let config_name = command_matches.value_of("config").unwrap_or("config");
    let settings = ClientSettings::load(config_name)?;
    let client = NodeClient::new(&settings);
    let node = client.node_address().clone();
    event!(Level::DEBUG, "Using node {}", node);

    match command_matches.subcommand() {
        ("state", Some(_)) => {
            let state = client.send_get_state().await?;
            println!("{}", serde_json::to_string_pretty(&state)?);
        }
        ("nodes", Some(_)) => {
            for known in client.send_get_nodes().await? {
                println!("{}", known);
            }
        }
        ("addnode", Some(matches)) => {
            let new_node = node_from_matches(matches)?;
            client.send_add_node(new_node.clone()).await?;
            println!("added {}", new_node);
        }
        ("removenode", Some(matches)) => {
            let old_node = node_from_matches(matches)?;
            client.send_remove_node(old_node.clone()).await?;
            println!("removed {}", old_node);
        }
        ("balance", Some(matches)) => {
            let address = address_from_matches(matches)?;
            let balance = client.send_get_balance(&node, address).await?;
            println!("{}", serde_json::to_string_pretty(&balance)?);
        }
        ("history", Some(matches)) => {
            let address = address_from_matches(matches)?;
            for tx in client.send_get_history(&node, address).await? {
                let direction = if tx.outgoing { "out" } else { "in" };
                println!(
                    "{} {:>4} {} {} -> {}",
                    hex::encode(&tx.txid),
                    direction,
                    tx.amount,
                    tx.from,
                    tx.to
                );
            }
        }
        ("unspent", Some(matches)) => {
            let address = address_from_matches(matches)?;
            let unspent = client.send_get_unspent(&node, address, &[]).await?;
            for output in unspent.transactions.iter() {
                println!(
                    "{}:{} {}{}",
                    hex::encode(&output.txid),
                    output.vout,
                    output.amount,
                    if output.is_base { " (coinbase)" } else { "" }
                );
            }
            println!("chain tip: {}", hex::encode(&unspent.last_block));
        }
        ("stop", Some(_)) => {
            client.send_void(&node).await?;
            println!("void sent to {}", node);
        }
        _ => {
            println!("{}", command_matches.usage());
        }
    }

    Ok(())
}
