use std::{
    fmt,
    io::{self, BufRead, Write},
    thread,
};

use clap::{value_t, App, Arg, ArgMatches};
use once_cell::sync::Lazy;
use planebattle::{
    board::{CellStatus, Dimensions},
    game::{Fleet, GameError, Handoff, PlayerState, ToolMode},
    input::{Intent, PointerEvent},
    planes::{PlaneList, PlanePart},
    Coordinate, Game, GameConfig, Phase, Player,
};
use rand::{rngs::StdRng, SeedableRng};
use regex::Regex;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Matches a tap on a single cell, such as `b5` or `tap b5`.
static TAP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:tap\s+)?(?P<cell>[a-z][0-9]+)$").unwrap());

/// Matches a drag between two cells, such as `drag b5 to d7`.
static DRAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?x)(?:drag|move)\s+
        (?P<from>[a-z][0-9]+)\s+
        (?:(?:to|->)\s+)?
        (?P<to>[a-z][0-9]+)$",
    )
    .unwrap()
});

fn main() -> io::Result<()> {
    let matches = App::new("Plane Battle")
        .version("0.1")
        .author("Zachary Stewart <zachary@zstewart.com>")
        .about("Two player plane battle, played by passing one terminal back and forth.")
        .arg(
            Arg::with_name("grid_size")
                .short("g")
                .long("grid-size")
                .value_name("SIZE")
                .help("side length of each player's grid, at most 26")
                .takes_value(true)
                .default_value("10"),
        )
        .arg(
            Arg::with_name("planes")
                .short("p")
                .long("planes")
                .value_name("COUNT")
                .help("number of planes each player places")
                .takes_value(true)
                .default_value("3"),
        )
        .arg(
            Arg::with_name("player1")
                .long("player1")
                .value_name("NAME")
                .help("name of the first player")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("player2")
                .long("player2")
                .value_name("NAME")
                .help("name of the second player")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("seed")
                .long("seed")
                .value_name("SEED")
                .help("seed for random fleet arrangements")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("log engine events to stderr, repeat for more detail"),
        )
        .get_matches();

    init_logging(matches.occurrences_of("verbose"));

    let mut game = match Game::new(build_config(&matches)) {
        Ok(game) => game,
        Err(err) => {
            eprintln!("Invalid settings: {}", err);
            std::process::exit(2);
        }
    };
    let mut rng = if matches.is_present("seed") {
        StdRng::seed_from_u64(value_t!(matches, "seed", u64).unwrap_or_else(|e| e.exit()))
    } else {
        StdRng::from_entropy()
    };

    let stdin = io::stdin();
    let mut input = InputReader::new(stdin.lock());

    loop {
        let flow = match game.phase() {
            Phase::Setup => setup_command(&mut game, &mut rng, &mut input)?,
            Phase::Transition(handoff) => handoff_screen(&mut game, handoff, &mut input)?,
            Phase::Battle => battle_command(&mut game, &mut input)?,
            Phase::GameOver(winner) => game_over(&mut game, winner, &mut input)?,
        };
        if let Flow::Quit = flow {
            break;
        }
    }
    Ok(())
}

/// Install the stderr logger. `RUST_LOG` overrides the verbosity flags.
fn init_logging(verbosity: u64) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Build the game settings from the command line.
fn build_config(matches: &ArgMatches) -> GameConfig {
    let mut config = GameConfig::default();
    config.grid_size = value_t!(matches, "grid_size", usize).unwrap_or_else(|e| e.exit());
    config.planes_per_player = value_t!(matches, "planes", usize).unwrap_or_else(|e| e.exit());
    if let Some(name) = matches.value_of("player1") {
        config.player_names[0] = name.to_owned();
    }
    if let Some(name) = matches.value_of("player2") {
        config.player_names[1] = name.to_owned();
    }
    config
}

/// Whether to keep playing.
enum Flow {
    Continue,
    Quit,
}

enum Command {
    Tap(Coordinate),
    Drag(Coordinate, Coordinate),
    Face,
    Random,
    Clear,
    Done,
    Attack,
    Deduce,
    Rotate,
    Delete,
    Deselect,
    End,
    Log,
    Help,
    Quit,
}

fn parse_command(input: &str) -> Option<Command> {
    Some(match input {
        "?" | "help" | "h" => Command::Help,
        "face" | "turn" | "f" => Command::Face,
        "random" | "rand" | "randomize" => Command::Random,
        "clear" => Command::Clear,
        "done" | "ready" => Command::Done,
        "attack" | "a" => Command::Attack,
        "deduce" | "ghost" | "d" => Command::Deduce,
        "rotate" | "r" => Command::Rotate,
        "delete" | "del" => Command::Delete,
        "deselect" => Command::Deselect,
        "end" | "pass" => Command::End,
        "log" => Command::Log,
        "quit" | "exit" | "q" => Command::Quit,
        other => {
            if let Some(captures) = DRAG.captures(other) {
                Command::Drag(parse_cell(&captures["from"])?, parse_cell(&captures["to"])?)
            } else if let Some(captures) = TAP.captures(other) {
                Command::Tap(parse_cell(&captures["cell"])?)
            } else {
                println!("Unknown command \"{}\". Use '?' for help.", other);
                return None;
            }
        }
    })
}

fn parse_cell(text: &str) -> Option<Coordinate> {
    match text.parse() {
        Ok(coord) => Some(coord),
        Err(err) => {
            println!("{}", err);
            None
        }
    }
}

/// Read and run one command while the active player arranges their fleet.
fn setup_command(
    game: &mut Game,
    rng: &mut StdRng,
    input: &mut InputReader<impl BufRead>,
) -> io::Result<Flow> {
    let player = game.active_player();
    println!();
    println!("{}, arrange your planes. Type help or ? for commands.", player.name());
    show_board(game.dimensions(), |coord| own_tile(player, coord));
    let remaining = game
        .config()
        .planes_per_player
        .saturating_sub(player.planes().len());
    if game.setup_valid() {
        println!("All planes placed, type done to confirm.");
    } else if remaining > 0 {
        println!(
            "Planes left to place: {}. New planes face {:?}.",
            remaining,
            game.facing()
        );
    } else {
        println!("Lowercase planes overlap or leave the grid; fix them to continue.");
    }

    match input.read_input_lower("setup>", parse_command)? {
        Command::Tap(coord) => tap(game, coord),
        Command::Drag(from, to) => drag(game, from, to),
        Command::Face => println!("New planes now face {:?}.", game.rotate_facing()),
        Command::Random => report(game.randomize_planes(rng)),
        Command::Clear => report(game.clear_planes()),
        Command::Done => report(game.confirm_setup()),
        Command::Help => print_help(),
        Command::Quit => return Ok(Flow::Quit),
        Command::Attack
        | Command::Deduce
        | Command::Rotate
        | Command::Delete
        | Command::Deselect
        | Command::End
        | Command::Log => println!("That command is only available during battle."),
    }
    Ok(Flow::Continue)
}

/// Read and run one command during the active player's battle turn.
fn battle_command(game: &mut Game, input: &mut InputReader<impl BufRead>) -> io::Result<Flow> {
    let me = game.active_player();
    let them = game.opponent();
    println!();
    println!(
        "{}: {} of your planes flying, {} of {}'s.",
        me.name(),
        me.alive_count(),
        them.alive_count(),
        them.name()
    );
    println!("Your planes:");
    show_board(game.dimensions(), |coord| own_tile(me, coord));
    println!("{}'s sky:", them.name());
    show_board(game.dimensions(), |coord| target_tile(game, coord));
    if me.has_shot() {
        println!("You have fired. Type end to pass the device.");
    }
    let prompt = match game.tool() {
        ToolMode::Attack => "attack>",
        ToolMode::Deduce => match game.selected_ghost() {
            Some(id) => {
                println!("Ghost {} selected: rotate, delete or deselect it.", id);
                "deduce>"
            }
            None => "deduce>",
        },
    };

    match input.read_input_lower(prompt, parse_command)? {
        Command::Tap(coord) => tap(game, coord),
        Command::Drag(from, to) => drag(game, from, to),
        Command::Face => println!("New ghosts now face {:?}.", game.rotate_facing()),
        Command::Attack => report(game.set_tool(ToolMode::Attack)),
        Command::Deduce => report(game.set_tool(ToolMode::Deduce)),
        Command::Rotate => report(game.rotate_selected_ghost()),
        Command::Delete => report(game.delete_selected_ghost()),
        Command::Deselect => game.deselect_ghost(),
        Command::End => report(game.end_turn()),
        Command::Log => show_log(game),
        Command::Help => print_help(),
        Command::Quit => return Ok(Flow::Quit),
        Command::Random | Command::Clear | Command::Done => {
            println!("That command is only available during setup.")
        }
    }
    Ok(Flow::Continue)
}

/// Hide the boards while the device changes hands.
fn handoff_screen(
    game: &mut Game,
    handoff: Handoff,
    input: &mut InputReader<impl BufRead>,
) -> io::Result<Flow> {
    print!("\x1B[2J\x1B[H");
    let next = game.player(handoff.to).name().to_owned();
    println!("Pass the device to {}.", next);
    if let Some(delay) = game.handoff_delay() {
        thread::sleep(delay);
        report(game.acknowledge_handoff());
    }
    input.read_input(&format!("{}, press Enter when you are ready.", next), |_| {
        Some(())
    })?;
    if let Phase::Transition(_) = game.phase() {
        report(game.acknowledge_handoff());
    }
    Ok(Flow::Continue)
}

fn game_over(
    game: &mut Game,
    winner: Player,
    input: &mut InputReader<impl BufRead>,
) -> io::Result<Flow> {
    println!();
    println!("{} wins!", game.player(winner).name());
    for &player in &[Player::P1, Player::P2] {
        let state = game.player(player);
        println!("{}'s planes:", state.name());
        show_board(game.dimensions(), |coord| own_tile(state, coord));
    }
    show_log(game);
    let again = input.read_input_lower("Play again? (y/N)", |answer| match answer {
        "y" | "yes" => Some(true),
        "n" | "no" | "" => Some(false),
        _ => None,
    })?;
    if again {
        game.restart();
        info!("game restarted");
        Ok(Flow::Continue)
    } else {
        Ok(Flow::Quit)
    }
}

/// Press and release the pointer on one cell.
fn tap(game: &mut Game, coord: Coordinate) {
    game.pointer(PointerEvent::Down(coord));
    match game.pointer(PointerEvent::Up(coord)) {
        Some(Intent::Attack(_)) => {
            if let Some(record) = game.log().recent().next() {
                println!("{}", record);
            }
        }
        Some(intent) => debug!(?intent, "tap applied"),
        None => println!("Nothing to do at {}.", coord),
    }
}

/// Press on one cell and release on another.
fn drag(game: &mut Game, from: Coordinate, to: Coordinate) {
    game.pointer(PointerEvent::Down(from));
    game.pointer(PointerEvent::Move(to));
    if let Some(preview) = game.preview() {
        if !preview.valid {
            println!("The plane does not fit at {}.", to);
        }
    }
    match game.pointer(PointerEvent::Up(to)) {
        Some(intent) => debug!(?intent, "drag applied"),
        None => println!("There is no plane head at {} to drag.", from),
    }
}

fn report(result: Result<(), GameError>) {
    if let Err(err) = result {
        println!("{}", err);
    }
}

fn show_log(game: &Game) {
    if game.log().is_empty() {
        println!("No shots fired yet.");
    }
    for record in game.log().recent().take(10) {
        println!("  {}", record);
    }
}

fn print_help() {
    println!(
        "Cells are named by column letter and row number, such as b5.

Setup commands:
    <cell>               place a plane with its head at the cell, or turn the plane
                         whose head is there.
    drag <cell> <cell>   move the plane whose head is at the first cell.
    face                 turn the direction new planes face.
    random               arrange the whole fleet at random.
    clear                remove every plane.
    done                 confirm the fleet and pass the device.

Battle commands:
    <cell>               shoot the cell, or while deducing, place or select a ghost.
    attack / deduce      switch between shooting and sketching ghost planes.
    drag <cell> <cell>   move the ghost whose head is at the first cell.
    rotate / delete      turn or remove the selected ghost.
    deselect             clear the ghost selection.
    face                 turn the direction new ghosts face.
    end                  pass the device after firing.
    log                  show the latest shots.

    quit                 leave the game.

Board key:
    H W B T   head, wing, body and tail of a plane (lowercase if misplaced)
    ~         open sky
    o x X     miss, hit, destroyed head
    g G       ghost plane, selected ghost plane"
    );
}

/// One cell of a rendered board.
enum Tile {
    Sea,
    Part { part: PlanePart, valid: bool },
    Miss,
    Hit,
    Dead,
    Ghost { selected: bool },
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(match self {
            Tile::Sea => "~",
            Tile::Part { part, valid: true } => match part {
                PlanePart::Head => "H",
                PlanePart::Wing => "W",
                PlanePart::Body => "B",
                PlanePart::Tail => "T",
            },
            Tile::Part { part, valid: false } => match part {
                PlanePart::Head => "h",
                PlanePart::Wing => "w",
                PlanePart::Body => "b",
                PlanePart::Tail => "t",
            },
            Tile::Miss => "o",
            Tile::Hit => "x",
            Tile::Dead => "X",
            Tile::Ghost { selected: false } => "g",
            Tile::Ghost { selected: true } => "G",
        })
    }
}

/// A player's own board, fully revealed.
fn own_tile(state: &PlayerState, coord: Coordinate) -> Tile {
    match state.fleet() {
        Fleet::Setup(setup) => match state.planes().plane_at(coord) {
            Some(plane) => {
                let valid = setup
                    .violations(plane.id())
                    .map_or(true, |found| found.is_empty());
                plane
                    .part_at(coord)
                    .map_or(Tile::Sea, |part| Tile::Part { part, valid })
            }
            None => Tile::Sea,
        },
        Fleet::Deployed(board) => match board.get_coord(coord) {
            Some(cell) => match (cell.status(), cell.part()) {
                (CellStatus::Plane, Some(part)) => Tile::Part { part, valid: true },
                (CellStatus::Miss, _) => Tile::Miss,
                (CellStatus::Hit, _) => Tile::Hit,
                (CellStatus::Dead, _) => Tile::Dead,
                _ => Tile::Sea,
            },
            None => Tile::Sea,
        },
    }
}

/// The opponent's board as the active player sees it: shots and ghosts only.
fn target_tile(game: &Game, coord: Coordinate) -> Tile {
    let status = game
        .opponent()
        .grid()
        .get_coord(coord)
        .map(|cell| cell.status());
    match status {
        Some(CellStatus::Miss) => Tile::Miss,
        Some(CellStatus::Hit) => Tile::Hit,
        Some(CellStatus::Dead) => Tile::Dead,
        _ => match game.active_player().ghosts().planes().plane_at(coord) {
            Some(ghost) => Tile::Ghost {
                selected: game.selected_ghost() == Some(ghost.id()),
            },
            None => Tile::Sea,
        },
    }
}

/// Print a board with lettered columns and numbered rows.
fn show_board(dim: &Dimensions, tile: impl Fn(Coordinate) -> Tile) {
    print!("    ");
    for x in 0..dim.size() {
        print!("{:^3}", (b'A' + x as u8) as char);
    }
    println!();
    for (y, row) in dim.iter_coordinates().enumerate() {
        print!("{:>3} ", y + 1);
        for coord in row {
            print!("{:^3}", tile(coord));
        }
        println!();
    }
}

/// Helper to read input from the players.
struct InputReader<B> {
    read: B,
    buf: String,
}

impl<B> InputReader<B> {
    fn new(read: B) -> Self {
        Self {
            read,
            buf: String::new(),
        }
    }
}

impl<B: BufRead> InputReader<B> {
    /// Repeatedly tries to read input until the input checker returns `Some`. Converts
    /// to ascii lower before running the checker.
    fn read_input_lower<F, T>(&mut self, prompt: &str, mut checker: F) -> io::Result<T>
    where
        F: FnMut(&str) -> Option<T>,
    {
        loop {
            self.read_input_inner(prompt)?;
            self.buf.make_ascii_lowercase();
            if let Some(val) = checker(self.buf.trim()) {
                return Ok(val);
            }
        }
    }

    /// Repeatedly tries to read input until the input checker returns `Some`.
    fn read_input<F, T>(&mut self, prompt: &str, mut checker: F) -> io::Result<T>
    where
        F: FnMut(&str) -> Option<T>,
    {
        loop {
            self.read_input_inner(prompt)?;
            if let Some(val) = checker(self.buf.trim()) {
                return Ok(val);
            }
        }
    }

    /// Helper to print the prompt, clear the string buffer and read a line.
    fn read_input_inner(&mut self, prompt: &str) -> io::Result<()> {
        print!("{} ", prompt);
        io::stdout().flush()?;
        self.buf.clear();
        if self.read.read_line(&mut self.buf)? == 0 {
            println!();
            std::process::exit(0);
        }
        Ok(())
    }
}
