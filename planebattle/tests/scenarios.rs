//! End-to-end games driven through the public API.
use planebattle::{
    board::{CannotShootReason, CellStatus, Dimensions},
    game::{AttackOutcome, GameError, Handoff, Resume},
    input::{Intent, PointerEvent},
    planes::{self, Direction, Plane, PlaneId, PlanePart, PlaneShape, ShapeOffset},
    Coordinate, Game, GameConfig, Phase, Player,
};

fn c(x: i32, y: i32) -> Coordinate {
    Coordinate::new(x, y)
}

/// Heads of three non-overlapping upward planes, the first at the corner.
const FLEET: [(i32, i32); 3] = [(2, 0), (7, 0), (4, 5)];

fn place(game: &mut Game, heads: &[(i32, i32)]) {
    for &(x, y) in heads {
        game.place_plane(c(x, y)).unwrap();
    }
    game.confirm_setup().unwrap();
    game.acknowledge_handoff().unwrap();
}

fn battle(p1: &[(i32, i32)], p2: &[(i32, i32)]) -> Game {
    let mut game = Game::default();
    place(&mut game, p1);
    place(&mut game, p2);
    assert_eq!(game.phase(), Phase::Battle);
    game
}

fn pass(game: &mut Game) {
    game.end_turn().unwrap();
    assert_eq!(
        game.phase(),
        Phase::Transition(Handoff {
            to: game.active().opponent(),
            resume: Resume::Battle,
            automatic: false
        })
    );
    game.acknowledge_handoff().unwrap();
}

#[test]
fn upward_plane_cells() {
    let plane = Plane::new(PlaneId(0), c(3, 3), Direction::Up, &PlaneShape::standard());
    let cells: Vec<_> = plane.cells().iter().map(|cell| (cell.part, cell.coord)).collect();
    assert_eq!(
        cells,
        vec![
            (PlanePart::Head, c(3, 3)),
            (PlanePart::Wing, c(1, 4)),
            (PlanePart::Wing, c(2, 4)),
            (PlanePart::Wing, c(3, 4)),
            (PlanePart::Wing, c(4, 4)),
            (PlanePart::Wing, c(5, 4)),
            (PlanePart::Body, c(3, 5)),
            (PlanePart::Tail, c(2, 6)),
            (PlanePart::Tail, c(3, 6)),
            (PlanePart::Tail, c(4, 6)),
        ]
    );
    assert!(planes::is_valid(&plane, &[], &Dimensions::default()));
}

#[test]
fn confirmed_fleet_is_stamped() {
    let mut game = Game::default();
    for &(x, y) in FLEET.iter() {
        game.place_plane(c(x, y)).unwrap();
    }
    game.confirm_setup().unwrap();
    let p1 = game.player(Player::P1);
    assert!(p1.ready());
    assert_eq!(p1.alive_count(), 3);
    for plane in p1.planes() {
        for cell in plane.cells() {
            let stamped = p1.grid().get_coord(cell.coord).unwrap();
            assert_eq!(stamped.status(), CellStatus::Plane);
            assert_eq!(stamped.plane(), Some(plane.id()));
            assert_eq!(stamped.part(), Some(cell.part));
        }
    }
    let planted = p1
        .grid()
        .iter_rows()
        .flatten()
        .filter(|cell| cell.status() == CellStatus::Plane)
        .count();
    assert_eq!(planted, 30);
}

#[test]
fn head_shot_kills_once() {
    // A head in the corner needs every other cell to trail off down and to the right,
    // so use a half-plane whose wing and tail sit on one side of the head.
    let shape = PlaneShape::new(vec![
        ShapeOffset::new(0, 0, PlanePart::Head),
        ShapeOffset::new(0, 1, PlanePart::Wing),
        ShapeOffset::new(1, 1, PlanePart::Wing),
        ShapeOffset::new(2, 1, PlanePart::Wing),
        ShapeOffset::new(0, 2, PlanePart::Body),
        ShapeOffset::new(0, 3, PlanePart::Tail),
        ShapeOffset::new(1, 3, PlanePart::Tail),
    ])
    .unwrap();
    let mut game = Game::new(GameConfig {
        shape,
        ..GameConfig::default()
    })
    .unwrap();
    place(&mut game, &[(5, 0), (5, 4), (0, 6)]);
    place(&mut game, &[(0, 0), (4, 0), (7, 0)]);

    assert_eq!(game.alive_count(Player::P2), 3);
    assert_eq!(game.attack(c(0, 0)), Ok(AttackOutcome::Kill));
    let cell = game.opponent().grid().get_coord(c(0, 0)).unwrap();
    assert_eq!(cell.status(), CellStatus::Dead);
    assert_eq!(game.alive_count(Player::P2), 2);
    assert!(game.opponent().planes()[0].destroyed());

    pass(&mut game);
    game.attack(c(9, 9)).unwrap();
    pass(&mut game);
    match game.attack(c(0, 0)) {
        Err(GameError::Shot(err)) => {
            assert_eq!(err.reason(), CannotShootReason::AlreadyShot);
            assert_eq!(err.coord(), c(0, 0));
        }
        other => panic!("expected a rejected shot, got {:?}", other),
    }
    assert_eq!(game.alive_count(Player::P2), 2);
    assert!(!game.active_player().has_shot());
    assert_eq!(game.log().len(), 2);
}

#[test]
fn miss_uses_up_the_turn() {
    let mut game = battle(&FLEET, &FLEET);
    assert_eq!(game.attack(c(9, 9)), Ok(AttackOutcome::Miss));
    assert_eq!(
        game.opponent().grid().get_coord(c(9, 9)).unwrap().status(),
        CellStatus::Miss
    );
    assert!(game.active_player().has_shot());
    assert_eq!(game.attack(c(2, 0)), Err(GameError::AlreadyFired));
    assert_eq!(game.alive_count(Player::P2), 3);
}

#[test]
fn wing_hits_do_not_count() {
    let mut game = battle(&FLEET, &FLEET);
    assert_eq!(game.attack(c(0, 1)), Ok(AttackOutcome::Hit));
    assert_eq!(
        game.opponent().grid().get_coord(c(0, 1)).unwrap().status(),
        CellStatus::Hit
    );
    assert_eq!(game.alive_count(Player::P2), 3);
}

#[test]
fn alive_count_matches_destroyed_planes() {
    let mut game = battle(&FLEET, &FLEET);
    let shots = [(0, 1), (2, 0), (5, 5), (7, 0), (4, 7), (4, 5)];
    for (i, &(x, y)) in shots.iter().enumerate() {
        game.attack(c(x, y)).unwrap();
        let p2 = game.player(Player::P2);
        let census = p2.planes().iter().filter(|plane| !plane.destroyed()).count();
        assert_eq!(p2.alive_count(), census);
        if i + 1 == shots.len() {
            break;
        }
        pass(&mut game);
        game.attack(c(i as i32, 9)).unwrap();
        pass(&mut game);
    }
    assert_eq!(game.phase(), Phase::GameOver(Player::P1));
    assert_eq!(game.winner(), Some(Player::P1));
    assert_eq!(game.attack(c(9, 9)), Err(GameError::WrongPhase {
        action: "attack",
        phase: Phase::GameOver(Player::P1),
    }));
}

#[test]
fn log_reads_newest_first() {
    let mut config = GameConfig::default();
    config.player_names = ["Ana".to_owned(), "Bo".to_owned()];
    let mut game = Game::new(config).unwrap();
    place(&mut game, &FLEET);
    place(&mut game, &FLEET);

    game.attack(c(1, 4)).unwrap();
    pass(&mut game);
    game.attack(c(2, 0)).unwrap();

    let recent: Vec<_> = game.log().recent().map(ToString::to_string).collect();
    assert_eq!(recent, vec!["#2 Bo C1 KILL", "#1 Ana B5 MISS"]);
    assert_eq!(game.log().records()[0].label(), "B5");
}

#[test]
fn labels() {
    assert_eq!(c(0, 0).label(), "A1");
    assert_eq!(c(1, 4).label(), "B5");
    assert_eq!("b5".parse::<Coordinate>(), Ok(c(1, 4)));
    assert!("5B".parse::<Coordinate>().is_err());
}

#[test]
fn whole_game_by_pointer() {
    use planebattle::input::PointerEvent::*;

    fn tap(game: &mut Game, x: i32, y: i32) -> Option<Intent> {
        game.pointer(PointerEvent::Down(c(x, y)));
        game.pointer(PointerEvent::Up(c(x, y)))
    }

    let mut game = Game::new(GameConfig {
        planes_per_player: 1,
        ..GameConfig::default()
    })
    .unwrap();
    assert_eq!(tap(&mut game, 4, 4), Some(Intent::Place(c(4, 4))));
    game.confirm_setup().unwrap();
    assert_eq!(tap(&mut game, 4, 4), None);
    game.acknowledge_handoff().unwrap();
    tap(&mut game, 2, 0);
    // A drag from the head repositions the plane.
    game.pointer(Down(c(2, 0)));
    game.pointer(Move(c(3, 3)));
    game.pointer(Leave);
    game.pointer(Up(c(6, 6)));
    assert_eq!(game.active_player().planes()[0].head(), c(6, 6));
    game.confirm_setup().unwrap();
    game.acknowledge_handoff().unwrap();

    assert_eq!(tap(&mut game, 0, 0), Some(Intent::Attack(c(0, 0))));
    assert_eq!(game.phase(), Phase::Battle);
    pass(&mut game);
    assert_eq!(tap(&mut game, 4, 4), Some(Intent::Attack(c(4, 4))));
    assert_eq!(game.phase(), Phase::GameOver(Player::P2));
    assert_eq!(tap(&mut game, 0, 0), None);
}

#[test]
fn rejected_configs() {
    assert!(Game::new(GameConfig {
        grid_size: 0,
        ..GameConfig::default()
    })
    .is_err());
    assert!(Game::new(GameConfig {
        planes_per_player: 0,
        ..GameConfig::default()
    })
    .is_err());
    let small = Game::new(GameConfig {
        grid_size: 5,
        planes_per_player: 1,
        ..GameConfig::default()
    })
    .unwrap();
    assert_eq!(small.dimensions().size(), 5);
}

#[cfg(feature = "rng_gen")]
#[test]
fn random_fleets_are_valid() {
    use planebattle::board::FleetSetup;
    use rand::{rngs::StdRng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(7);
    let mut game = Game::default();
    game.randomize_planes(&mut rng).unwrap();
    assert!(game.setup_valid());
    game.confirm_setup().unwrap();

    let mut tiny = FleetSetup::new(Dimensions::new(4), 1);
    assert!(tiny.randomize(&mut rng, &PlaneShape::standard()).is_err());
    assert!(tiny.planes().is_empty());
}

#[cfg(feature = "serde")]
#[test]
fn game_record_round_trips() {
    let mut game = battle(&FLEET, &FLEET);
    game.attack(c(2, 0)).unwrap();
    let json = serde_json::to_string(&game).unwrap();
    let back: Game = serde_json::from_str(&json).unwrap();
    assert_eq!(back, game);
}
