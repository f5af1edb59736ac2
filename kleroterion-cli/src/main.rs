use std::{
    io::Write,
    path::PathBuf,
    thread,
    time::{Duration, Instant},
};

use clap::Parser;
use kleroterion::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Catalog JSON file path
    #[arg(short, long, default_value = "catalog.json", value_name = "FILE")]
    catalog: PathBuf,

    /// Use a built-in demo catalog instead of loading from file
    #[arg(long, default_value_t = false, conflicts_with = "catalog")]
    demo: bool,

    /// Random seed for reproducibility
    #[arg(long, default_value = None)]
    seed: Option<u64>,

    /// Show cosmetic variant names on the card and draw variants randomly
    #[arg(long, default_value_t = false)]
    variants: bool,

    /// Exclude a character by name (repeatable)
    #[arg(long = "exclude-character", value_name = "NAME")]
    exclude_characters: Vec<String>,

    /// Exclude a variant by name (repeatable)
    #[arg(long = "exclude-variant", value_name = "NAME")]
    exclude_variants: Vec<String>,

    /// Exclude an accessory by name (repeatable)
    #[arg(long = "exclude-accessory", value_name = "NAME")]
    exclude_accessories: Vec<String>,

    /// Write the roll event log to this file on exit
    #[arg(short, long, value_name = "FILE")]
    log: Option<PathBuf>,

    /// Roll once and exit instead of prompting interactively
    #[arg(long, default_value_t = false)]
    once: bool,
}

/// Confetti falls through this abstract viewport; columns map 1:1 onto
/// terminal cells, rows are compressed by `CONFETTI_ROWS`.
const CONFETTI_VIEWPORT: Viewport = Viewport {
    width: 80.0,
    height: 48.0,
};
const CONFETTI_ROWS: usize = 12;
const CONFETTI_FRAME: Duration = Duration::from_millis(30);

fn demo_catalog() -> anyhow::Result<Catalog> {
    let characters = vec![
        Character::new(
            "Fox",
            vec![
                Variant::from_name("Fox"),
                Variant::from_name("Red Fox"),
                Variant::from_name("Night Fox"),
            ],
        ),
        Character::new(
            "Raccoon",
            vec![
                Variant::from_name("Raccoon"),
                Variant::from_name("Bandit Raccoon"),
            ],
        ),
        Character::new(
            "Owl",
            vec![Variant::from_name("Owl"), Variant::from_name("Snow Owl")],
        ),
        Character::new("Hare", vec![Variant::from_name("Hare")]),
    ];
    let accessories = vec![
        Accessory::new("Hat", "Hat.webp"),
        Accessory::new("Scarf", "Scarf.webp"),
        Accessory::new("Badge", "Badge.webp"),
        Accessory::new("Lantern", "Lantern.webp"),
        Accessory::new("Satchel", "Satchel.webp"),
        Accessory::new("Spyglass", "Spyglass.webp"),
    ];
    Ok(Catalog::new(characters, accessories)?)
}

fn render_card(card: &Card) -> Vec<String> {
    let mut lines = vec![format!("  Character:   {}", card.character)];
    if let Some(variant) = &card.variant {
        lines.push(format!("  Variant:     {variant}"));
    }
    lines.push(format!("  Look:        {}", card.image));
    lines.push(format!(
        "  Accessories: {} [{}]  +  {} [{}]",
        card.accessories[0].name,
        card.accessories[0].image,
        card.accessories[1].name,
        card.accessories[1].image,
    ));
    lines
}

/// Moves the cursor up over the previously printed block and clears to the
/// end of the screen, so the next block draws in place.
fn erase_lines(count: usize) {
    if count > 0 {
        print!("\x1b[{count}A\x1b[0J");
    }
}

fn print_block(lines: &[String]) {
    let mut stdout = std::io::stdout();
    for line in lines {
        let _ = writeln!(stdout, "{line}");
    }
    let _ = stdout.flush();
}

/// Renders the reveal animation: each tick redraws the card block in
/// place. Waiting out the tick delay stays with the `run` driver.
#[derive(Default)]
struct CardPrinter {
    lines_printed: usize,
}

impl RollHook for CardPrinter {
    fn on_roll_start(&mut self) {
        self.lines_printed = 0;
    }

    fn on_step(&mut self, card: &Card, _step: u32, _delay: Duration) {
        let lines = render_card(card);
        erase_lines(self.lines_printed);
        print_block(&lines);
        self.lines_printed = lines.len();
    }
}

fn confetti_frame(batch: &ConfettiBatch) -> Vec<String> {
    let viewport = batch.viewport();
    let columns = viewport.width as usize;
    let mut grid = vec![vec![None::<&Particle>; columns]; CONFETTI_ROWS];
    for particle in batch.particles() {
        let row = (particle.y / viewport.height * CONFETTI_ROWS as f32).floor();
        let column = particle.x.floor();
        if (0.0..CONFETTI_ROWS as f32).contains(&row) && (0.0..viewport.width).contains(&column) {
            grid[row as usize][column as usize] = Some(particle);
        }
    }

    grid.into_iter()
        .map(|row| {
            let mut line = String::new();
            for cell in row {
                match cell {
                    Some(particle) => {
                        let (r, g, b) = particle.color.rgb();
                        let dim = if particle.opacity < 0.35 { "\x1b[2m" } else { "" };
                        line.push_str(&format!("{dim}\x1b[38;2;{r};{g};{b}m•\x1b[0m"));
                    }
                    None => line.push(' '),
                }
            }
            line
        })
        .collect()
}

/// Runs the confetti burst to its fixed expiry, then tears the frame
/// region down.
fn animate_confetti(batch: &mut ConfettiBatch) {
    let launched = Instant::now();
    let mut lines_printed = 0;
    while !batch.expired(launched.elapsed()) {
        let frame = confetti_frame(batch);
        erase_lines(lines_printed);
        print_block(&frame);
        lines_printed = frame.len();
        batch.advance();
        thread::sleep(CONFETTI_FRAME);
    }
    erase_lines(lines_printed);
    let _ = std::io::stdout().flush();
}

fn read_command(prompt: &str) -> anyhow::Result<String> {
    print!("{prompt}");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_lowercase())
}

fn load_catalog(args: &Args) -> anyhow::Result<Catalog> {
    if args.demo {
        log::info!("Using demo catalog");
        demo_catalog()
    } else {
        log::info!("Loading catalog from {}", args.catalog.display());
        Ok(Catalog::from_path(&args.catalog)?)
    }
}

fn build_exclusions(args: &Args) -> Exclusions {
    let mut exclusions = Exclusions::new();
    for name in &args.exclude_characters {
        exclusions.exclude_character(name.clone());
    }
    for name in &args.exclude_variants {
        exclusions.exclude_variant(name.clone());
    }
    for name in &args.exclude_accessories {
        exclusions.exclude_accessory(name.clone());
    }
    exclusions
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::builder()
        .format_timestamp_secs()
        .filter_level(log::LevelFilter::Info)
        .init();
    log::info!("Starting roller with args: {:?}", args);

    let exclusions = build_exclusions(&args);
    let mut roller = match args.seed {
        Some(seed) => Roller::from_seed(seed),
        None => Roller::new(),
    };
    let mut engine = RollEngine::new(RollSchedule::default());
    engine.add_hook(CardPrinter::default());

    'session: loop {
        if !args.once {
            let command = read_command("\nPress Enter to roll (q to quit): ")?;
            if command == "q" {
                break 'session;
            }
        }

        // The catalog is re-read on every roll invocation, so edits to the
        // file show up without a restart.
        let catalog = match load_catalog(&args) {
            Ok(catalog) => catalog,
            Err(err) => {
                println!("Error loading catalog: {err}");
                if args.once {
                    return Err(err);
                }
                continue;
            }
        };

        let completed = engine.run(
            &catalog,
            &exclusions,
            args.variants,
            &mut roller,
            thread::sleep,
        )?;

        log::info!("Roll landed at {}", completed.finished_at);

        // Completion effects: the confetti burst and fresh reroll
        // bindings, then the roll prompt comes back once the burst is
        // torn down.
        let mut reroller = Reroller::bind(&completed);
        let mut confetti = ConfettiBatch::launch(CONFETTI_VIEWPORT, &mut roller);
        engine.log.record(RollEvent::ConfettiLaunched {
            pieces: confetti.particles().len(),
        });
        animate_confetti(&mut confetti);
        engine.finish()?;

        if args.once {
            println!();
            print_block(&render_card(reroller.card()));
            break 'session;
        }

        loop {
            println!();
            print_block(&render_card(reroller.card()));
            let command = read_command(
                "\n[c] reroll character  [1]/[2] reroll accessory  [Enter] roll again  [q] quit: ",
            )?;
            match command.as_str() {
                "" => break,
                "q" => break 'session,
                "c" => {
                    let update = reroller.reroll_character(
                        &catalog,
                        &exclusions,
                        args.variants,
                        &mut roller,
                    )?;
                    engine.log.record(RollEvent::SlotRerolled {
                        slot: update.slot,
                        name: update.name,
                    });
                }
                "1" | "2" => {
                    let index = if command == "1" { 0 } else { 1 };
                    let update =
                        reroller.reroll_accessory(index, &catalog, &exclusions, &mut roller)?;
                    engine.log.record(RollEvent::SlotRerolled {
                        slot: update.slot,
                        name: update.name,
                    });
                }
                other => println!("Unrecognized command: {other:?}"),
            }
        }
    }

    if let Some(path) = &args.log {
        engine.save_log(path)?;
        log::info!("Roll log written to {}", path.display());
    }

    Ok(())
}
