//! Tests for the router module

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::commands::{
    AllScopes, AutocompleteHandler, Command, CommandBody, CommandDefinition, CommandGroup,
    CommandHandler, CommandKind, GuildId, LeafBody, Subcommand, SubcommandGroup, autocomplete_fn,
    handler_fn,
};
use crate::interaction::{AutocompleteInteraction, CommandInteraction, InteractionEvent};
use crate::sync::{GuildCommand, ScopeRegistry};
use crate::tree::CommandTree;

fn counter(hits: &Arc<AtomicUsize>) -> Arc<dyn CommandHandler> {
    let hits = hits.clone();
    handler_fn(move |_| {
        let hits = hits.clone();
        async move {
            hits.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    })
}

fn completer(hits: &Arc<AtomicUsize>) -> Arc<dyn AutocompleteHandler> {
    let hits = hits.clone();
    autocomplete_fn(move |_| {
        let hits = hits.clone();
        async move {
            hits.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    })
}

fn leaf(
    name: &str,
    definition: CommandDefinition,
    run: Arc<dyn CommandHandler>,
    autocomplete: Option<Arc<dyn AutocompleteHandler>>,
) -> Command {
    Command::from_definition(
        name,
        "",
        definition,
        CommandBody::Leaf(LeafBody { run, autocomplete }),
        false,
    )
}

fn subcommand(
    name: &str,
    run: Arc<dyn CommandHandler>,
    autocomplete: Option<Arc<dyn AutocompleteHandler>>,
) -> Subcommand {
    Subcommand {
        name: name.to_string(),
        description: format!("Run {}", name),
        options: Vec::new(),
        run,
        autocomplete,
    }
}

struct Fixture {
    router: InteractionRouter,
    ping: Arc<AtomicUsize>,
    kick: Arc<AtomicUsize>,
    ban: Arc<AtomicUsize>,
    role_add: Arc<AtomicUsize>,
    complete: Arc<AtomicUsize>,
    vote: Arc<AtomicUsize>,
}

fn fixture() -> Fixture {
    let ping = Arc::new(AtomicUsize::new(0));
    let kick = Arc::new(AtomicUsize::new(0));
    let ban = Arc::new(AtomicUsize::new(0));
    let role_add = Arc::new(AtomicUsize::new(0));
    let complete = Arc::new(AtomicUsize::new(0));
    let vote = Arc::new(AtomicUsize::new(0));

    let mut tree = CommandTree::new();
    tree.insert(leaf(
        "ping",
        CommandDefinition::chat_input("Replies with pong"),
        counter(&ping),
        None,
    ))
    .unwrap();
    tree.insert(leaf(
        "quote",
        CommandDefinition::context_menu(CommandKind::MessageContextMenu),
        counter(&ping),
        None,
    ))
    .unwrap();

    let mut group = CommandGroup::new();
    group
        .subcommands
        .insert("kick".into(), subcommand("kick", counter(&kick), Some(completer(&complete))));
    group
        .subcommands
        .insert("ban".into(), subcommand("ban", counter(&ban), None));
    let mut role = BTreeMap::new();
    role.insert("add".to_string(), subcommand("add", counter(&role_add), None));
    group.subcommand_groups.insert(
        "role".into(),
        SubcommandGroup {
            name: "role".into(),
            description: "/admin role".into(),
            subcommands: role,
        },
    );
    tree.insert(Command::from_definition(
        "admin",
        "",
        CommandDefinition::chat_input("/admin"),
        CommandBody::Group(group),
        false,
    ))
    .unwrap();

    let registry = ScopeRegistry::from_commands(vec![GuildCommand::new(
        leaf(
            "vote",
            CommandDefinition::chat_input("Vote on something"),
            counter(&vote),
            None,
        ),
        Arc::new(AllScopes),
    )])
    .unwrap();

    let router = InteractionRouter::new(Arc::new(RwLock::new(tree)))
        .with_guild_commands(Arc::new(RwLock::new(registry)));

    Fixture {
        router,
        ping,
        kick,
        ban,
        role_add,
        complete,
        vote,
    }
}

fn invoke(interaction: CommandInteraction) -> InteractionEvent {
    InteractionEvent::Command(interaction)
}

#[tokio::test]
async fn test_leaf_command_dispatch() {
    let f = fixture();
    let outcome = f
        .router
        .dispatch(&invoke(CommandInteraction::chat_input("ping")))
        .await;
    assert!(outcome.is_handled());
    assert_eq!(f.ping.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_group_dispatch_runs_only_addressed_subcommand() {
    let f = fixture();
    let outcome = f
        .router
        .dispatch(&invoke(
            CommandInteraction::chat_input("admin").with_subcommand(None, "kick"),
        ))
        .await;
    assert_eq!(outcome, RouteOutcome::Handled);
    assert_eq!(f.kick.load(Ordering::SeqCst), 1);
    assert_eq!(f.ban.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_subcommand_group_dispatch() {
    let f = fixture();
    let outcome = f
        .router
        .dispatch(&invoke(
            CommandInteraction::chat_input("admin").with_subcommand(Some("role"), "add"),
        ))
        .await;
    assert!(outcome.is_handled());
    assert_eq!(f.role_add.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unknown_command_is_dropped() {
    let f = fixture();
    let outcome = f
        .router
        .dispatch(&invoke(CommandInteraction::chat_input("missing")))
        .await;
    assert_eq!(outcome, RouteOutcome::UnknownCommand("missing".into()));
    assert!(outcome.is_dropped());
}

#[tokio::test]
async fn test_kind_mismatch_is_dropped() {
    let f = fixture();
    let outcome = f
        .router
        .dispatch(&invoke(CommandInteraction::user("quote", 5)))
        .await;
    assert_eq!(
        outcome,
        RouteOutcome::KindMismatch {
            command: "quote".into(),
            expected: CommandKind::MessageContextMenu,
            received: CommandKind::UserContextMenu,
        }
    );
    assert_eq!(f.ping.load(Ordering::SeqCst), 0);

    let ok = f
        .router
        .dispatch(&invoke(CommandInteraction::message("quote", 5)))
        .await;
    assert!(ok.is_handled());
}

#[tokio::test]
async fn test_stale_subcommand_names() {
    let f = fixture();

    let outcome = f
        .router
        .dispatch(&invoke(
            CommandInteraction::chat_input("admin").with_subcommand(None, "mute"),
        ))
        .await;
    assert!(matches!(
        outcome,
        RouteOutcome::Stale(RoutingError::UnknownSubcommand { ref subcommand, .. }) if subcommand == "mute"
    ));

    let outcome = f
        .router
        .dispatch(&invoke(
            CommandInteraction::chat_input("admin").with_subcommand(Some("channel"), "add"),
        ))
        .await;
    assert_eq!(
        outcome,
        RouteOutcome::Stale(RoutingError::UnknownSubcommandGroup {
            command: "admin".into(),
            group: "channel".into(),
        })
    );

    let outcome = f
        .router
        .dispatch(&invoke(CommandInteraction::chat_input("admin")))
        .await;
    assert!(matches!(
        outcome,
        RouteOutcome::Stale(RoutingError::MissingSubcommand { .. })
    ));
}

#[tokio::test]
async fn test_group_autocomplete_uses_subcommand_handler() {
    let f = fixture();
    let event = InteractionEvent::Autocomplete(
        AutocompleteInteraction::new("admin")
            .with_subcommand(None, "kick")
            .with_focused("member", "jo"),
    );
    assert!(f.router.dispatch(&event).await.is_handled());
    assert_eq!(f.complete.load(Ordering::SeqCst), 1);
    assert_eq!(f.kick.load(Ordering::SeqCst), 0);

    let event = InteractionEvent::Autocomplete(
        AutocompleteInteraction::new("admin").with_subcommand(None, "ban"),
    );
    assert_eq!(
        f.router.dispatch(&event).await,
        RouteOutcome::NoAutocomplete("admin".into())
    );
}

#[tokio::test]
async fn test_autocomplete_without_handler_or_on_context_menu() {
    let f = fixture();

    let outcome = f
        .router
        .dispatch(&InteractionEvent::Autocomplete(AutocompleteInteraction::new("ping")))
        .await;
    assert_eq!(outcome, RouteOutcome::NoAutocomplete("ping".into()));

    let outcome = f
        .router
        .dispatch(&InteractionEvent::Autocomplete(AutocompleteInteraction::new("quote")))
        .await;
    assert!(matches!(outcome, RouteOutcome::KindMismatch { .. }));
}

#[tokio::test]
async fn test_guild_commands_are_routable() {
    let f = fixture();
    let outcome = f
        .router
        .dispatch(&invoke(
            CommandInteraction::chat_input("vote").in_guild(GuildId(3)),
        ))
        .await;
    assert!(outcome.is_handled());
    assert_eq!(f.vote.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_handler_failure_is_reported() {
    let mut tree = CommandTree::new();
    tree.insert(leaf(
        "boom",
        CommandDefinition::chat_input("Always fails"),
        handler_fn(|_| async { Err(anyhow::anyhow!("exploded")) }),
        None,
    ))
    .unwrap();
    let router = InteractionRouter::new(Arc::new(RwLock::new(tree)));

    let outcome = router
        .dispatch(&invoke(CommandInteraction::chat_input("boom")))
        .await;
    assert_eq!(
        outcome,
        RouteOutcome::HandlerFailed {
            command: "boom".into(),
            message: "exploded".into(),
        }
    );
    assert!(!outcome.is_dropped());
}

#[test]
fn test_routing_error_messages() {
    let err = RoutingError::UnknownSubcommand {
        command: "admin".into(),
        group: Some("role".into()),
        subcommand: "drop".into(),
    };
    assert_eq!(
        err.to_string(),
        "Command 'admin' has no subcommand 'drop' in group 'role'"
    );
}
