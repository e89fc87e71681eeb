mod common;

use common::{drain, hall_world, start_game};
use manor::game::{CommandHandler, CommandModule, Dispatch, FinishReason, GameError};

#[test]
fn start_describes_the_first_room() {
    let (_game, mut output) = start_game(hall_world());
    let lines = drain(&mut output);
    assert_eq!(lines[0], "You wake up in a dusty manor.");
    assert!(lines.iter().any(|l| l.contains("help")));
    assert!(lines.iter().any(|l| l.starts_with('*') && l.contains("Hall")));
    assert!(lines.contains(&"There are 3 exits: east, north and south".to_string()));
    assert!(lines.contains(&"There are 1 items: key | A rusty key".to_string()));
}

#[tokio::test]
async fn collect_move_use_scenario() {
    let (mut game, mut output) = start_game(hall_world());
    drain(&mut output);

    assert_eq!(
        game.dispatch("collect key").unwrap(),
        Dispatch::Ran("collect".to_string())
    );
    let names: Vec<&str> = game.player().inventory().iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["key"]);
    assert!(game.state().current_room().unwrap().items.is_empty());
    assert_eq!(drain(&mut output), vec!["You picked up a key!"]);

    game.dispatch("move north").unwrap();
    assert_eq!(game.state().current_room_id(), "library");
    let lines = drain(&mut output);
    assert!(lines[0].contains("Library"));
    assert_eq!(lines[1], "Rows of rotting books.");
    assert_eq!(lines[2], "There are 2 exits: south and west");
    assert_eq!(lines[3], "There are 1 items: book | A mouldy book");

    game.dispatch("use key").unwrap();
    assert_eq!(game.player().health(), 90);
    assert!(game.player().inventory().is_empty());
    assert_eq!(drain(&mut output), vec!["You took 10 damage!"]);
}

#[test]
fn unknown_verb_is_reported_and_harmless() {
    let (mut game, mut output) = start_game(hall_world());
    drain(&mut output);

    let outcome = game.dispatch("frobnicate the widget").unwrap();
    assert_eq!(outcome, Dispatch::Rejected("Command not found".to_string()));
    assert_eq!(drain(&mut output), vec!["Command not found"]);
    assert_eq!(game.player().health(), 100);
    assert_eq!(game.state().current_room_id(), "hall");
    assert!(!game.is_finished());
}

#[test]
fn missing_items_and_exits_are_domain_errors() {
    let (mut game, mut output) = start_game(hall_world());
    drain(&mut output);

    assert_eq!(
        game.dispatch("collect sword").unwrap(),
        Dispatch::Rejected("This item does not exist".to_string())
    );
    assert_eq!(
        game.dispatch("use key").unwrap(),
        Dispatch::Rejected("This item does not exist".to_string())
    );
    assert_eq!(
        game.dispatch("move west").unwrap(),
        Dispatch::Rejected("Cannot move in this direction".to_string())
    );
    assert_eq!(
        game.dispatch("move").unwrap(),
        Dispatch::Rejected("Usage: move <direction>".to_string())
    );
    assert_eq!(game.state().current_room_id(), "hall");
    assert!(game.state().current_room().unwrap().has_item("key"));
}

#[test]
fn items_are_never_in_two_places() {
    let (mut game, _output) = start_game(hall_world());

    game.dispatch("collect key").unwrap();
    assert_eq!(
        game.dispatch("collect key").unwrap(),
        Dispatch::Rejected("This item does not exist".to_string())
    );
    assert_eq!(game.player().inventory().len(), 1);
    assert!(!game.state().current_room().unwrap().has_item("key"));
    assert!(game.player().has_item("key"));
}

#[test]
fn list_reports_empty_inventory_then_contents() {
    let (mut game, mut output) = start_game(hall_world());
    drain(&mut output);

    assert_eq!(
        game.dispatch("list").unwrap(),
        Dispatch::Rejected("You currently have no items".to_string())
    );
    assert_eq!(
        drain(&mut output),
        vec!["You have the following items:", "You currently have no items"]
    );

    game.dispatch("collect key").unwrap();
    drain(&mut output);
    game.dispatch("list").unwrap();
    assert_eq!(
        drain(&mut output),
        vec!["You have the following items:", "\tkey | A rusty key"]
    );
}

#[test]
fn help_lists_every_registered_command() {
    let (mut game, mut output) = start_game(hall_world());
    drain(&mut output);

    game.dispatch("help").unwrap();
    let lines = drain(&mut output);
    assert_eq!(lines[0], "Commands:");
    for verb in ["collect", "help", "list", "move", "use"] {
        assert!(
            lines.iter().any(|l| l.starts_with(&format!("{}: ", verb))),
            "help is missing {}",
            verb
        );
    }
    assert_eq!(lines.len(), 6);
}

#[test]
fn blank_input_does_nothing() {
    let (mut game, mut output) = start_game(hall_world());
    drain(&mut output);
    assert_eq!(game.dispatch("   ").unwrap(), Dispatch::Empty);
    assert!(drain(&mut output).is_empty());
}

#[test]
fn entering_an_ending_room_finishes_once() {
    let (mut game, mut output) = start_game(hall_world());
    game.dispatch("move north").unwrap();
    game.dispatch("move west").unwrap();
    assert!(game.is_finished());
    assert_eq!(game.session().reason(), Some(FinishReason::ReachedExit));
    assert!(!game.finish(FinishReason::Died));
    let finishes = drain(&mut output)
        .into_iter()
        .filter(|l| l == FinishReason::ReachedExit.message())
        .count();
    assert_eq!(finishes, 1);
}

struct LookModule;

impl CommandModule for LookModule {
    fn name(&self) -> &str {
        "look"
    }

    fn commands(&self) -> Vec<CommandHandler> {
        vec![
            CommandHandler::new("look", "Describe the current room.", |ctx, _args| {
                let room = ctx.state.current_room()?;
                let text = format!("{}: {}", room.name, room.description);
                ctx.notify(text);
                Ok(())
            }),
            CommandHandler::new("help", "Ask for help politely.", |ctx, _args| {
                ctx.notify("No one can help you here.");
                Ok(())
            }),
        ]
    }
}

#[test]
fn modules_add_verbs_and_last_registration_wins() {
    let (mut game, mut output) = start_game(hall_world());
    drain(&mut output);
    game.registry_mut().register_module(&LookModule);
    assert_eq!(game.registry().len(), 6);

    game.dispatch("look").unwrap();
    assert_eq!(drain(&mut output), vec!["Hall: A long hall."]);

    game.dispatch("help").unwrap();
    assert_eq!(drain(&mut output), vec!["No one can help you here."]);
    assert_eq!(
        game.registry().get("help").unwrap().description,
        "Ask for help politely."
    );
}

#[test]
fn non_domain_errors_propagate() {
    let (mut game, _output) = start_game(hall_world());
    game.registry_mut().register(CommandHandler::new(
        "explode",
        "Always fails.",
        |_ctx, _args| Err(GameError::Internal("boom".to_string())),
    ));
    let err = game.dispatch("explode now").unwrap_err();
    assert!(!err.is_domain());
    assert!(matches!(err, GameError::Internal(ref m) if m == "boom"));
}

#[test]
fn arguments_keep_inner_whitespace() {
    let (mut game, mut output) = start_game(hall_world());
    drain(&mut output);
    game.registry_mut().register(CommandHandler::new(
        "echo",
        "Repeat the arguments.",
        |ctx, args| {
            ctx.notify(format!("[{}]", args));
            Ok(())
        },
    ));
    game.dispatch("echo   golden  key ").unwrap();
    assert_eq!(drain(&mut output), vec!["[golden  key]"]);
}
