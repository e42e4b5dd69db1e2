use dice_replay::{Error, RandomEngine, RollHistory, RollId};
use log::{error, info};
use std::io::{self, BufRead, Write};

struct Options {
    seed: Option<u64>,
    max_rolls: Option<usize>,
}

fn parse_args() -> Result<Options, String> {
    let mut options = Options {
        seed: None,
        max_rolls: Some(dice_replay::roll::DEFAULT_MAX_ROLLS),
    };
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        let value = args
            .next()
            .ok_or_else(|| format!("missing value for {}", arg))?;
        match arg.as_str() {
            "--seed" => {
                options.seed = Some(value.parse().map_err(|_| format!("bad seed: {}", value))?)
            }
            "--max-rolls" => {
                options.max_rolls = match value.as_str() {
                    "none" => None,
                    n => Some(n.parse().map_err(|_| format!("bad roll limit: {}", n))?),
                }
            }
            _ => return Err(format!("unknown argument: {}", arg)),
        }
    }
    Ok(options)
}

fn parse_positions(list: &str) -> Result<Vec<usize>, String> {
    list.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| p.parse().map_err(|_| format!("bad position: {}", p)))
        .collect()
}

fn report(err: &Error) {
    eprintln!("{}: {}", err.code(), err);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();

    let options = parse_args()?;
    let mut engine = match options.seed {
        Some(seed) => RandomEngine::seeded(seed),
        None => RandomEngine::from_entropy(),
    };
    info!("seed {:?}, roll limit {:?}", options.seed, options.max_rolls);

    let mut history = RollHistory::new();
    let mut last: Option<RollId> = None;

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    print!("> ");
    io::stdout().flush()?;
    while let Some(Ok(line)) = lines.next() {
        let line = line.trim();
        match line {
            "" => {}
            ":quit" | ":q" => break,
            ":history" => match last {
                Some(id) => {
                    let mut chain = history.ancestors(id);
                    chain.reverse();
                    for roll in chain {
                        println!("  {}", roll);
                    }
                    if let Ok(roll) = history.get(id) {
                        println!("* {}", roll);
                    }
                }
                None => println!("no rolls yet"),
            },
            _ if line.starts_with(":reroll") => {
                let positions = match parse_positions(&line[":reroll".len()..]) {
                    Ok(p) => p,
                    Err(why) => {
                        eprintln!("{}", why);
                        continue_prompt()?;
                        continue;
                    }
                };
                match last {
                    Some(id) => match history.reroll_bounded(id, positions, &mut engine, options.max_rolls) {
                        Ok(new_id) => {
                            last = Some(new_id);
                            if let Ok(roll) = history.get(new_id) {
                                println!("{}", roll);
                            }
                        }
                        Err(why) => report(&why),
                    },
                    None => println!("nothing to reroll"),
                }
            }
            expression => {
                match dice_replay::roll_bounded(expression, &mut engine, None, options.max_rolls) {
                    Ok(roll) => {
                        println!("{}", roll);
                        last = Some(history.insert(roll));
                    }
                    Err(why) => {
                        error!("failed to roll {:?}", expression);
                        report(&why);
                    }
                }
            }
        }
        continue_prompt()?;
    }
    Ok(())
}

fn continue_prompt() -> io::Result<()> {
    print!("> ");
    io::stdout().flush()
}
