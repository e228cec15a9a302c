use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::mpsc;

use content::repository::{ChallengeSource, MiniGameSource, ProgressStore};
use content::{InMemoryProgressStore, StaticCatalog};
use quest_core::model::{Position, ProgressRecord, Subject};
use quest_core::Clock;
use services::games::{BattleOutcome, PROBLEM_TIME_LIMIT};
use services::timer::{spawn_countdown, TimerEvent};
use services::{Attempt, ChallengeFlow, GameLauncher, MazeRun, ProgressService, SessionError};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidSubject { raw: String },
    InvalidCount { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidSubject { raw } => write!(f, "invalid --subject value: {raw}"),
            ArgsError::InvalidCount { raw } => write!(f, "invalid --count value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- quiz     [--subject math|reading] [--count <n>] [--fast]");
    eprintln!("  cargo run -p app -- monster  [--fast]");
    eprintln!("  cargo run -p app -- maze     [--fast]");
    eprintln!("  cargo run -p app -- puzzles  [--fast]");
    eprintln!("  cargo run -p app -- progress [--fast]");
    eprintln!();
    eprintln!("Defaults for quiz:");
    eprintln!("  --subject math");
    eprintln!("  --count 5");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUEST_SUBJECT, QUEST_COUNT, QUEST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Quiz,
    Monster,
    Maze,
    Puzzles,
    Progress,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "quiz" => Some(Self::Quiz),
            "monster" => Some(Self::Monster),
            "maze" => Some(Self::Maze),
            "puzzles" => Some(Self::Puzzles),
            "progress" => Some(Self::Progress),
            _ => None,
        }
    }
}

struct Args {
    subject: Subject,
    count: usize,
    fast: bool,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut subject = std::env::var("QUEST_SUBJECT")
            .ok()
            .and_then(|value| value.parse::<Subject>().ok())
            .unwrap_or(Subject::Math);
        let mut count = std::env::var("QUEST_COUNT")
            .ok()
            .and_then(|value| value.parse::<usize>().ok())
            .unwrap_or(ChallengeFlow::DEFAULT_CHALLENGE_COUNT);
        let mut fast = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--subject" => {
                    let value = require_value(args, "--subject")?;
                    subject = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidSubject { raw: value.clone() })?;
                }
                "--count" => {
                    let value = require_value(args, "--count")?;
                    let parsed: usize = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidCount { raw: value.clone() })?;
                    if parsed == 0 {
                        return Err(ArgsError::InvalidCount { raw: value });
                    }
                    count = parsed;
                }
                "--fast" => fast = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            subject,
            count,
            fast,
        })
    }
}

struct AppServices {
    catalog: Arc<StaticCatalog>,
    progress: Arc<InMemoryProgressStore>,
}

fn build_services(fast: bool) -> Result<AppServices, Box<dyn std::error::Error>> {
    let clock = Clock::default_clock();
    let mut catalog = StaticCatalog::from_embedded()?;
    let mut progress = InMemoryProgressStore::from_embedded(clock)?;
    if fast {
        catalog = catalog.with_latency(Duration::ZERO);
        progress = progress.with_latency(Duration::ZERO);
    }
    Ok(AppServices {
        catalog: Arc::new(catalog),
        progress: Arc::new(progress),
    })
}

type LineReader = Lines<BufReader<Stdin>>;

async fn read_choice(lines: &mut LineReader) -> Result<Option<String>, std::io::Error> {
    let Some(line) = lines.next_line().await? else {
        return Ok(None);
    };
    Ok(Some(line.trim().to_string()))
}

/// Map a numeric choice to its option text; anything else is taken as a
/// literal answer.
fn resolve_choice(options: &[String], raw: &str) -> String {
    if let Ok(index) = raw.parse::<usize>() {
        if index >= 1 && index <= options.len() {
            return options[index - 1].clone();
        }
    }
    raw.to_string()
}

fn print_options(options: &[String]) {
    for (index, option) in options.iter().enumerate() {
        println!("  {}) {option}", index + 1);
    }
}

fn prompt() -> std::io::Result<()> {
    use std::io::Write as _;
    let mut out = std::io::stdout();
    out.write_all(b"> ")?;
    out.flush()
}

fn print_progress_record(record: &ProgressRecord) {
    println!("Total stars:   {}", record.total_stars());
    println!("Math level:    {}", record.level(Subject::Math));
    println!("Reading level: {}", record.level(Subject::Reading));
    let skills: Vec<&str> = record
        .skills_mastered()
        .iter()
        .map(|skill| skill.as_str())
        .collect();
    println!("Skills:        {}", skills.join(", "));
}

async fn run_quiz(
    services: &AppServices,
    subject: Subject,
    count: usize,
    lines: &mut LineReader,
) -> Result<(), Box<dyn std::error::Error>> {
    let flow = ChallengeFlow::new(
        Clock::default_clock(),
        Arc::clone(&services.catalog) as Arc<dyn ChallengeSource>,
        Arc::clone(&services.progress) as Arc<dyn ProgressStore>,
    )
    .with_challenge_count(count);

    let mut session = match flow.start(subject).await {
        Ok(session) => session,
        Err(SessionError::NoContent) => {
            eprintln!("No challenges available for this subject. Try again later.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    while !session.is_complete() {
        let Some(challenge) = session.current_challenge() else {
            break;
        };
        println!();
        println!(
            "Challenge {} of {}  ({} - level {})",
            session.answered_count() + 1,
            session.total_challenges(),
            challenge.skill(),
            challenge.difficulty()
        );
        if let Some(story) = challenge.story() {
            println!();
            println!("{story}");
        }
        println!();
        println!("{}", challenge.prompt());
        print_options(challenge.options());
        if let Some(hint) = challenge.hint() {
            println!("  (hint: {hint})");
        }
        prompt()?;

        let options = challenge.options().to_vec();
        let Some(raw) = read_choice(lines).await? else {
            println!();
            return Ok(());
        };
        let answer = resolve_choice(&options, &raw);
        let result = flow
            .answer_current(&mut session, Attempt::answer(answer))
            .await?;
        if result.review.correct {
            println!("Correct! +{} stars", result.review.stars_awarded);
        } else {
            println!("Not quite. +{} star", result.review.stars_awarded);
        }

        if let Some(summary) = result.summary {
            println!();
            println!("{}", summary.tier().message());
            println!(
                "Stars earned: {}   Correct: {}/{}   Accuracy: {}%",
                summary.stars_earned(),
                summary.correct(),
                summary.total_challenges(),
                summary.accuracy()
            );
            let record = services.progress.current().await?;
            print_progress_record(&record);
        }
    }

    Ok(())
}

async fn run_monster(
    services: &AppServices,
    lines: &mut LineReader,
) -> Result<(), Box<dyn std::error::Error>> {
    let launcher = GameLauncher::new(Arc::clone(&services.catalog) as Arc<dyn MiniGameSource>);
    let mut battle = match launcher.monster_battle().await {
        Ok(battle) => battle,
        Err(SessionError::NoContent) => {
            eprintln!("No problems available for Monster Math. Try again later.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!("A monster appears! Answer fast; each problem gives you 30 seconds.");
    while !battle.is_over() {
        let Some(problem) = battle.current_problem() else {
            break;
        };
        println!();
        println!(
            "Problem {} of {}   Monster HP: {}   Score: {}",
            battle.problem_number(),
            battle.total_problems(),
            battle.monster_hp(),
            battle.score()
        );
        println!("{}", problem.prompt());
        print_options(problem.options());
        if let Some(hint) = battle.hint() {
            println!("  (hint: {hint})");
        }
        prompt()?;

        let options = problem.options().to_vec();
        let (events_tx, mut events_rx) = mpsc::unbounded_channel();
        let countdown = spawn_countdown(PROBLEM_TIME_LIMIT, Duration::from_secs(1), events_tx);

        let answered = loop {
            tokio::select! {
                line = lines.next_line() => {
                    countdown.stop();
                    match line? {
                        Some(raw) => break Some(resolve_choice(&options, raw.trim())),
                        None => return Ok(()),
                    }
                }
                event = events_rx.recv() => {
                    if event == Some(TimerEvent::Expired) {
                        break None;
                    }
                }
            }
        };

        let round = match answered.as_deref() {
            Some(answer) => battle.submit(answer)?,
            None => {
                println!("Time's up! Moving to the next problem.");
                battle.time_up()?
            }
        };
        if round.correct {
            println!("Hit! The monster takes damage.");
        } else if answered.is_some() {
            println!("Miss! The monster is still standing.");
        }
    }

    println!();
    match battle.outcome() {
        Some(BattleOutcome::Victory) => println!("Victory! You defeated the monster!"),
        _ => println!("Game over. The monster survived; try again!"),
    }
    println!("Final score: {}", battle.score());
    Ok(())
}

fn render_maze(run: &MazeRun) {
    let maze = run.maze();
    for row in 0..maze.grid_size() {
        let mut line = String::new();
        for col in 0..maze.grid_size() {
            let cell = Position::new(row, col);
            let ch = if cell == run.position() {
                '@'
            } else if cell == maze.end() {
                'G'
            } else if cell == maze.start() {
                'S'
            } else if run.path().contains(&cell) {
                '*'
            } else {
                '.'
            };
            line.push(ch);
            line.push(' ');
        }
        println!("  {line}");
    }
    println!("  (@ you, S start, G goal, * visited)");
}

async fn run_maze(
    services: &AppServices,
    lines: &mut LineReader,
) -> Result<(), Box<dyn std::error::Error>> {
    let launcher = GameLauncher::new(Arc::clone(&services.catalog) as Arc<dyn MiniGameSource>);
    let mut run = match launcher.maze_run().await {
        Ok(run) => run,
        Err(SessionError::NoContent) => {
            eprintln!("No maze available. Try again later.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    while !run.is_complete() {
        println!();
        render_maze(&run);
        let Some(question) = run.current_question() else {
            break;
        };
        println!(
            "Question {} of {}   Score: {}",
            run.question_number(),
            run.total_questions(),
            run.score()
        );
        println!("{}", question.prompt());
        print_options(question.options());
        prompt()?;

        let options = question.options().to_vec();
        let Some(raw) = read_choice(lines).await? else {
            println!();
            return Ok(());
        };
        let step = run.answer(&resolve_choice(&options, &raw))?;
        if step.correct {
            println!("Correct! Moving to ({}).", step.position);
        } else {
            println!("Wrong answer! Try again.");
        }
    }

    println!();
    render_maze(&run);
    println!("Maze completed! Final score: {}", run.score());
    Ok(())
}

async fn run_puzzles(
    services: &AppServices,
    lines: &mut LineReader,
) -> Result<(), Box<dyn std::error::Error>> {
    let launcher = GameLauncher::new(Arc::clone(&services.catalog) as Arc<dyn MiniGameSource>);
    let mut round = match launcher.puzzle_round().await {
        Ok(round) => round,
        Err(SessionError::NoContent) => {
            eprintln!("No puzzles available. Try again later.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    while !round.is_complete() {
        let Some(puzzle) = round.current_puzzle() else {
            break;
        };
        println!();
        println!(
            "Puzzle {} of {}   Score: {}",
            round.puzzle_number(),
            round.total_puzzles(),
            round.score()
        );
        println!("{}", puzzle.prompt());
        print_options(puzzle.options());
        prompt()?;

        let options = puzzle.options().to_vec();
        let Some(raw) = read_choice(lines).await? else {
            println!();
            return Ok(());
        };
        let drop = round.drop_answer(&resolve_choice(&options, &raw))?;
        if drop.correct {
            println!("Perfect! You solved it.");
        } else {
            println!("Not quite! Try again.");
        }
    }

    println!();
    println!("All puzzles solved! Final score: {}", round.score());
    Ok(())
}

async fn run(args_vec: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = args_vec;

    let cmd = match argv.first().map(String::as_str) {
        None => Command::Quiz,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Quiz,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let services = build_services(parsed.fast)?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    match cmd {
        Command::Quiz => run_quiz(&services, parsed.subject, parsed.count, &mut lines).await,
        Command::Monster => run_monster(&services, &mut lines).await,
        Command::Maze => run_maze(&services, &mut lines).await,
        Command::Puzzles => run_puzzles(&services, &mut lines).await,
        Command::Progress => {
            let progress =
                ProgressService::new(Arc::clone(&services.progress) as Arc<dyn ProgressStore>);
            let record = progress.current().await?;
            print_progress_record(&record);
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("QUEST_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let argv: Vec<String> = std::env::args().skip(1).collect();
    if let Err(err) = run(argv).await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
