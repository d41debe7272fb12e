use std::{process::ExitCode, sync::Arc};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use futures::StreamExt;
use uuid::Uuid;
use zoo_loop::{
    config::{settings, Settings},
    game::{
        board::board,
        session::Session,
        types::{GameState, MAX_PLAYERS},
    },
    store::{GameStore, MemoryStore, RedisStore},
    tx::Outcome,
};

/// Zoo Loop - roll, tour the loop, and build the biggest zoo
#[derive(Parser, Debug)]
#[command(name = "zoo-loop")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Player identity (defaults to $PLAYER_ID, else a fresh UUID)
    #[arg(short, long, global = true)]
    player: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a new game and take the first seat
    Create,
    /// Take a seat in an existing game
    Join { code: String },
    /// Roll the dice (must be your turn)
    Roll { code: String },
    /// Buy the animal you are being offered
    Buy { code: String },
    /// Pass on the animal you are being offered
    Skip { code: String },
    /// Print the current game document
    Show { code: String },
    /// Follow a game and print every committed change
    Watch { code: String },
    /// Print the board layout
    Board,
    /// Play a full local game between bots, without Redis
    Demo {
        /// Number of bots (2-6)
        #[arg(short = 'n', long, default_value = "3")]
        players: usize,

        /// Rolls to play before stopping
        #[arg(short, long, default_value = "30")]
        turns: u32,

        /// Seed for reproducible dice
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::init();

    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let settings = settings().clone();

    match args.command {
        Commands::Board => {
            for space in board() {
                println!("{:>2}  {:<9} {}", space.id, space.kind.label(), space.name);
            }
            Ok(())
        }
        Commands::Demo {
            players,
            turns,
            seed,
        } => demo(players, turns, seed, settings).await,
        command => {
            let player = player_id(args.player, &settings);
            let store = Arc::new(
                RedisStore::connect(&settings.redis_url)
                    .await
                    .with_context(|| format!("connecting to {}", settings.redis_url))?,
            );
            online(command, store, player, settings).await
        }
    }
}

fn player_id(arg: Option<String>, settings: &Settings) -> String {
    if let Some(id) = arg.or_else(|| settings.player_id.clone()) {
        return id;
    }
    let id = Uuid::new_v4().to_string();
    println!("Your player id is {id} (export PLAYER_ID={id} to keep it).");
    id
}

async fn online(
    command: Commands,
    store: Arc<RedisStore>,
    player: String,
    settings: Settings,
) -> anyhow::Result<()> {
    let buy = matches!(command, Commands::Buy { .. });
    match command {
        Commands::Create => {
            let session = Session::create(store, player, settings).await?;
            println!("Game code: {}", session.code());
            print_state(&session.state().await?, session.player_id());
        }
        Commands::Join { code } => {
            let (session, event) = Session::join(store, &code, player, settings).await?;
            println!("{}: {}", event.title, event.body);
            print_state(&session.state().await?, session.player_id());
        }
        Commands::Roll { code } => {
            let session = Session::attach(store, &code, player, settings).await?;
            report(&session, session.roll().await?);
        }
        Commands::Buy { code } | Commands::Skip { code } => {
            let session = Session::attach(store, &code, player, settings).await?;
            report(&session, session.resolve_offer(buy).await?);
        }
        Commands::Show { code } => {
            let session = Session::attach(store, &code, player, settings).await?;
            print_state(&session.state().await?, session.player_id());
        }
        Commands::Watch { code } => {
            let session = Session::attach(store, &code, player, settings).await?;
            print_state(&session.state().await?, session.player_id());
            let mut updates = session.watch().await?;
            while let Some(state) = updates.next().await {
                println!();
                print_state(&state, session.player_id());
            }
        }
        Commands::Board | Commands::Demo { .. } => unreachable!("handled offline"),
    }
    Ok(())
}

fn report<S: GameStore + ?Sized>(session: &Session<S>, outcome: Outcome) {
    let event = outcome.event();
    println!("{}\n{}", event.title, event.body);
    if let Outcome::Committed { state, .. } = &outcome {
        println!();
        print_state(state, session.player_id());
    }
}

async fn demo(
    players: usize,
    turns: u32,
    seed: Option<u64>,
    mut settings: Settings,
) -> anyhow::Result<()> {
    if !(2..=MAX_PLAYERS).contains(&players) {
        bail!("demo needs between 2 and {MAX_PLAYERS} players");
    }
    settings.dice_seed = seed.or(settings.dice_seed);

    let store = Arc::new(MemoryStore::new());
    let host = Session::create(store.clone(), "bot-1", settings.clone()).await?;
    let mut seats = vec![host];
    for n in 2..=players {
        let code = seats[0].code().to_string();
        let (session, _) =
            Session::join(store.clone(), &code, format!("bot-{n}"), settings.clone()).await?;
        seats.push(session);
    }
    println!("Demo game {} with {players} bots", seats[0].code());

    for _ in 0..turns {
        let state = seats[0].state().await?;
        let Some(current) = state.current_player() else {
            bail!("game has no players");
        };
        let seat = seats
            .iter()
            .find(|s| s.player_id() == current.id)
            .context("current player has no session")?;

        let outcome = seat.roll().await?;
        let event = outcome.event();
        println!("[{}] {}: {}", seat.player_id(), event.title, event.body.replace('\n', " "));

        if let Outcome::Committed { state, .. } = &outcome {
            if let Some(offer) = &state.pending_offer {
                let me = state.player(seat.player_id()).map_or(0, |p| p.money);
                // Bots keep a cushion for vet bills and admissions.
                let buy = me - offer.animal.cost >= 300;
                let answer = seat.resolve_offer(buy).await?.event();
                println!("[{}] {}: {}", seat.player_id(), answer.title, answer.body);
            }
        }
    }

    println!();
    print_state(&seats[0].state().await?, seats[0].player_id());
    Ok(())
}

fn print_state(state: &GameState, me: &str) {
    for (i, p) in state.players.iter().enumerate() {
        let turn = if i == state.turn_index { ">" } else { " " };
        let you = if p.id == me { " (you)" } else { "" };
        println!(
            "{turn} zoo #{} {}{you}: space {:>2}, ${}, {} animals, {} tier points",
            p.home_zoo_index + 1,
            p.id,
            p.pos,
            p.money,
            p.animals,
            p.tier_points
        );
    }
    if let Some(dice) = &state.last_dice {
        print!("Last roll by {}: {} + {} = {}", dice.by, dice.d1, dice.d2, dice.total);
        match (dice.payday_roll, dice.payday_amount) {
            (Some(roll), Some(amount)) => println!(" (payday die {roll}: +${amount})"),
            _ => println!(),
        }
    }
    if let Some(offer) = &state.pending_offer {
        println!(
            "Pending offer for {}: {} at ${} (tier {})",
            offer.for_player_id, offer.animal.name, offer.animal.cost, offer.animal.tier
        );
    }
    if let Some(event) = &state.last_event {
        println!("{}: {}", event.title, event.body.replace('\n', " "));
    }
}
