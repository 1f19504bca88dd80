//! Spellduel - play a simplified duel against the AI from the terminal.
//!
//! ## Usage
//!
//! ```
//! spellduel [OPTIONS]
//!
//! Options:
//!   --deck <file.json>        Your decklist (defaults to the basic deck)
//!   --ai-deck <file.json>     The AI's decklist (defaults to the basic deck)
//!   --config <file.json>      Game settings; missing fields keep their defaults
//!   --difficulty <level>      easy | medium | hard
//!   --seed <n>                Fix shuffles and AI rolls
//! ```
//!
//! Type `help` at the prompt for the list of commands.

use spellduel::{
    ActionError, CardCatalog, CardRegistry, CardView, Decklist, DecklistFile, Difficulty, Duel,
    GameConfig, GameSnapshot, InstanceId, PlayerView,
};
use std::env;
use std::fs;
use std::io::{self, BufRead, Write};

struct CliArgs {
    deck: Option<String>,
    ai_deck: Option<String>,
    config: Option<String>,
    difficulty: Difficulty,
    seed: Option<u64>,
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = env::args().collect();
    let mut parsed = CliArgs {
        deck: None,
        ai_deck: None,
        config: None,
        difficulty: Difficulty::default(),
        seed: None,
    };

    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1).cloned();
        match (args[i].as_str(), value) {
            ("--deck", Some(path)) => parsed.deck = Some(path),
            ("--ai-deck", Some(path)) => parsed.ai_deck = Some(path),
            ("--config", Some(path)) => parsed.config = Some(path),
            ("--difficulty", Some(level)) => match level.parse() {
                Ok(difficulty) => parsed.difficulty = difficulty,
                Err(err) => eprintln!("Error: {err}"),
            },
            ("--seed", Some(seed)) => match seed.parse() {
                Ok(seed) => parsed.seed = Some(seed),
                Err(_) => eprintln!("Error: --seed requires a number"),
            },
            (flag, None) if flag.starts_with("--") => {
                eprintln!("Error: {flag} requires a value");
                i += 1;
                continue;
            }
            (other, _) => {
                eprintln!("Ignoring unknown argument '{other}'");
                i += 1;
                continue;
            }
        }
        i += 2;
    }
    parsed
}

fn load_deck(registry: &mut CardRegistry, path: Option<&str>) -> Result<Decklist, String> {
    let Some(path) = path else {
        return registry.basic_ai_deck().map_err(|err| err.to_string());
    };
    let text = fs::read_to_string(path).map_err(|err| format!("{path}: {err}"))?;
    DecklistFile::from_json(&text)
        .and_then(|file| file.resolve(registry))
        .map_err(|err| format!("{path}: {err}"))
}

fn load_config(path: Option<&str>) -> Result<GameConfig, String> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let text = fs::read_to_string(path).map_err(|err| format!("{path}: {err}"))?;
    serde_json::from_str(&text).map_err(|err| format!("{path}: {err}"))
}

fn describe(card: &CardView) -> String {
    let mut line = format!("{} {}", card.id, card.name);
    if !card.mana_cost.is_empty() {
        line.push_str(&format!(" {}", card.mana_cost));
    }
    if let (Some(power), Some(toughness)) = (card.power, card.toughness) {
        line.push_str(&format!(" {power}/{toughness}"));
    }
    if card.tapped {
        line.push_str(" (tapped)");
    }
    if card.summoning_sick {
        line.push_str(" (sick)");
    }
    line
}

fn print_player(view: &PlayerView, show_hand: bool) {
    println!(
        "{}: {} life, {} in library, {} mana available",
        view.key,
        view.life,
        view.library_count,
        view.mana_available.total()
    );
    if show_hand {
        println!("  Hand:");
        for card in &view.hand {
            println!("    {}", describe(card));
        }
    } else {
        println!("  Hand: {} cards", view.hand.len());
    }
    println!("  Battlefield:");
    for card in &view.battlefield {
        println!("    {}", describe(card));
    }
}

fn print_snapshot(snapshot: &GameSnapshot) {
    println!(
        "\n--- Turn {} | {} phase | {} to act ---",
        snapshot.turn_number, snapshot.phase, snapshot.active_player
    );
    print_player(&snapshot.ai, false);
    print_player(&snapshot.player, true);
    if snapshot.mulligan_window_open {
        println!("(mulligan or keep your opening hand)");
    }
}

fn print_help() {
    println!("Commands:");
    println!("  state                 Show the board");
    println!("  play <id>             Play a land or cast a spell from your hand");
    println!("  attack <id>           Attack with a creature");
    println!("  block <id>            Ready a creature to block on the AI's turn");
    println!("  activate <id> <n>     Activate ability n of a permanent");
    println!("  end                   End the current phase");
    println!("  mulligan | keep       Decide on your opening hand");
    println!("  cards <query>         Look up cards by name");
    println!("  log                   Show the game log");
    println!("  concede | quit");
}

fn parse_id(arg: Option<&str>) -> Option<InstanceId> {
    let raw = arg?.trim_start_matches('#');
    raw.parse().ok().map(InstanceId::from_raw)
}

fn report(result: Result<Vec<String>, ActionError>) {
    match result {
        Ok(messages) => {
            for message in messages {
                println!("{message}");
            }
        }
        Err(err) => println!("Can't do that: {err}"),
    }
}

fn main() {
    let args = parse_args();

    println!("========================================");
    println!("   Spellduel");
    println!("========================================\n");

    let mut registry = CardRegistry::with_builtin();
    let decks = load_deck(&mut registry, args.deck.as_deref()).and_then(|player| {
        load_deck(&mut registry, args.ai_deck.as_deref()).map(|ai| (player, ai))
    });
    let (player_deck, ai_deck) = match decks {
        Ok(decks) => decks,
        Err(err) => {
            eprintln!("Failed to load deck: {err}");
            std::process::exit(1);
        }
    };
    let mut config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Failed to load config: {err}");
            std::process::exit(1);
        }
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    println!(
        "{} ({} cards) vs {} ({} cards), AI on {}",
        player_deck.name,
        player_deck.total_cards(),
        ai_deck.name,
        ai_deck.total_cards(),
        args.difficulty
    );

    let mut duel = Duel::start_game(&player_deck, &ai_deck, args.difficulty, config);
    print_snapshot(&duel.get_snapshot());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        if let Some(result) = duel.result() {
            println!(
                "\nGame over: {} wins ({} {})",
                result.winner, result.loser, result.reason
            );
            break;
        }

        print!("> ");
        let _ = io::stdout().flush();
        let Some(Ok(line)) = lines.next() else {
            break;
        };
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };

        match command {
            "help" | "?" => print_help(),
            "state" | "s" => print_snapshot(&duel.get_snapshot()),
            "log" => {
                for entry in &duel.get_snapshot().log {
                    println!("{entry}");
                }
            }
            "cards" => {
                let query = words.collect::<Vec<_>>().join(" ");
                for card in registry.lookup(&query) {
                    println!("{} {} - {}", card.name, card.mana_cost, card.type_line);
                    if !card.rules_text.is_empty() {
                        println!("    {}", card.rules_text);
                    }
                }
            }
            "mulligan" => report(duel.mulligan()),
            "keep" => report(duel.keep_hand()),
            "play" | "attack" | "block" => {
                let Some(id) = parse_id(words.next()) else {
                    println!("Usage: {command} <id>");
                    continue;
                };
                report(match command {
                    "play" => duel.play_card(id),
                    "attack" => duel.declare_attacker(id),
                    _ => duel.declare_blocker(id),
                });
            }
            "activate" => {
                let id = parse_id(words.next());
                let index = words.next().and_then(|n| n.parse().ok());
                let (Some(id), Some(index)) = (id, index) else {
                    println!("Usage: activate <id> <ability index>");
                    continue;
                };
                report(duel.activate_ability(id, index));
            }
            "end" | "e" => {
                report(duel.end_phase());
                print_snapshot(&duel.get_snapshot());
            }
            "concede" => match duel.concede() {
                Ok(_) => println!("You conceded."),
                Err(err) => println!("Can't do that: {err}"),
            },
            "quit" | "exit" => break,
            other => println!("Unknown command '{other}'. Type 'help' for commands."),
        }
    }
}
