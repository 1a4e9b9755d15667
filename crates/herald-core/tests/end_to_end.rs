//! Load → sync → route, through the public API

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use herald_core::commands::CommandBinding;
use herald_core::remote::{RecordedCall, RemoteError};
use herald_core::{
    CommandInteraction, CommandKind, GuildId, HandlerRegistry, Herald, HeraldConfig,
    InteractionEvent, MemoryRegistry, RouteOutcome, Scope, ScopeFilter, handler_fn,
};
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn counting(hits: &Arc<AtomicUsize>) -> CommandBinding {
    let hits = hits.clone();
    CommandBinding::new(handler_fn(move |_| {
        let hits = hits.clone();
        async move {
            hits.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }))
}

struct Bot {
    _temp: TempDir,
    herald: Herald,
    remote: Arc<MemoryRegistry>,
    kick: Arc<AtomicUsize>,
    ban: Arc<AtomicUsize>,
}

async fn bot(configure: impl FnOnce(&mut HeraldConfig), extra: impl FnOnce(&Path)) -> Bot {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let temp = TempDir::new().unwrap();
    write(temp.path(), "ping.toml", "description = \"Replies with pong\"\n");
    write(temp.path(), "admin/kick.toml", "description = \"Kick a member\"\n");
    write(temp.path(), "admin/ban.toml", "description = \"Ban a member\"\n");
    write(temp.path(), "#guild/vote.toml", "description = \"Vote on something\"\n");
    extra(temp.path());

    let mut config = HeraldConfig {
        folder: temp.path().to_path_buf(),
        ..HeraldConfig::default()
    };
    configure(&mut config);

    let kick = Arc::new(AtomicUsize::new(0));
    let ban = Arc::new(AtomicUsize::new(0));
    let ping = Arc::new(AtomicUsize::new(0));
    let vote = Arc::new(AtomicUsize::new(0));
    let handlers = HandlerRegistry::new()
        .bind("ping", counting(&ping))
        .bind("admin/kick", counting(&kick))
        .bind("admin/ban", counting(&ban))
        .bind(
            "#guild/vote",
            counting(&vote).with_scope_policy(Arc::new(ScopeFilter::new(|guild| guild != GuildId(666)))),
        )
        .bind("owner/restart", counting(&Arc::new(AtomicUsize::new(0))));

    let remote = Arc::new(MemoryRegistry::new());
    let herald = Herald::load(config, handlers, remote.clone()).await.unwrap();

    Bot {
        _temp: temp,
        herald,
        remote,
        kick,
        ban,
    }
}

#[tokio::test]
async fn test_load_push_and_route() {
    let bot = bot(|_| {}, |_| {}).await;

    {
        let tree = bot.herald.tree();
        let tree = tree.read();
        assert_eq!(tree.names(), vec!["admin", "ping"]);
        assert_eq!(tree.get("ping").unwrap().kind, CommandKind::ChatInput);
        let admin = tree.get("admin").unwrap().as_group().unwrap().clone();
        assert_eq!(admin.subcommands.keys().collect::<Vec<_>>(), vec!["ban", "kick"]);
    }

    bot.herald.start().await.unwrap();
    let installed = bot.remote.commands(Scope::Default);
    assert_eq!(installed.len(), 2);
    assert!(bot.remote.find(Scope::Default, "vote").is_none());

    let event = InteractionEvent::Command(
        CommandInteraction::chat_input("admin").with_subcommand(None, "kick"),
    );
    assert_eq!(bot.herald.handle(&event).await, RouteOutcome::Handled);
    assert_eq!(bot.kick.load(Ordering::SeqCst), 1);
    assert_eq!(bot.ban.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_guild_lifecycle() {
    let bot = bot(|_| {}, |_| {}).await;
    bot.herald.start().await.unwrap();

    let report = bot.herald.on_guild_create(GuildId(1)).await.unwrap();
    assert_eq!(report.created, vec!["vote"]);
    assert!(bot.remote.find(Scope::Guild(GuildId(1)), "vote").is_some());

    // Excluded by the policy
    let report = bot.herald.on_guild_create(GuildId(666)).await.unwrap();
    assert!(report.created.is_empty());

    let event = InteractionEvent::Command(
        CommandInteraction::chat_input("vote").in_guild(GuildId(1)),
    );
    assert!(bot.herald.handle(&event).await.is_handled());

    assert_eq!(bot.herald.on_guild_delete(GuildId(1)), 1);
    let registry = bot.herald.synchronizer().registry();
    assert!(!registry.read().is_in("vote", GuildId(1)));
}

#[tokio::test]
async fn test_owner_command_goes_to_owner_guild_only() {
    let bot = bot(
        |config| config.owner_server = Some(GuildId(10)),
        |root| write(root, "owner/restart.toml", "description = \"Restart the bot\"\n"),
    )
    .await;
    bot.herald.start().await.unwrap();

    assert!(bot.remote.find(Scope::Default, "owner").is_none());
    let owner = bot.remote.find(Scope::Guild(GuildId(10)), "owner").unwrap();
    assert_eq!(owner.data.default_member_permissions.as_deref(), Some("0"));
}

#[tokio::test]
async fn test_single_server_mode() {
    let bot = bot(|config| config.single_server = Some(GuildId(3)), |_| {}).await;
    bot.herald.start().await.unwrap();

    assert!(bot.remote.commands(Scope::Default).is_empty());
    assert_eq!(bot.remote.commands(Scope::Guild(GuildId(3))).len(), 2);
}

#[tokio::test]
async fn test_debug_mode_waits_for_first_guild() {
    let bot = bot(
        |config| config.debug = true,
        |root| write(root, "#debug/trace.toml", "description = \"Trace the last event\"\n"),
    )
    .await;
    bot.herald.start().await.unwrap();
    assert!(bot.remote.calls().is_empty());
    assert_eq!(bot.herald.main_scope(), None);

    bot.herald.on_guild_create(GuildId(5)).await.unwrap();
    assert_eq!(bot.herald.main_scope(), Some(Scope::Guild(GuildId(5))));
    let names: Vec<_> = bot
        .remote
        .commands(Scope::Guild(GuildId(5)))
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert!(names.contains(&"trace".to_string()));
    assert!(names.contains(&"vote".to_string()));
}

#[tokio::test]
async fn test_reload_edits_the_remote_command() {
    let bot = bot(|_| {}, |_| {}).await;
    bot.herald.start().await.unwrap();
    let before = bot.remote.find(Scope::Default, "ping").unwrap();

    let folder = bot.herald.config().folder.clone();
    write(&folder, "ping.toml", "description = \"Replies with a louder pong\"\n");
    bot.herald.reload("ping").await.unwrap();

    let after = bot.remote.find(Scope::Default, "ping").unwrap();
    assert_eq!(after.id, before.id);
    assert_eq!(after.data.description.as_deref(), Some("Replies with a louder pong"));
    assert!(bot.remote.calls().iter().any(RecordedCall::is_edit));

    assert!(bot.herald.reload("missing").await.is_err());
}

#[tokio::test]
async fn test_reload_owner_edits_the_owner_guild_command() {
    let bot = bot(
        |config| config.owner_server = Some(GuildId(10)),
        |root| write(root, "owner/restart.toml", "description = \"Restart the bot\"\n"),
    )
    .await;
    bot.herald.start().await.unwrap();
    let owner_guild = Scope::Guild(GuildId(10));
    let before = bot.remote.find(owner_guild, "owner").unwrap();

    let folder = bot.herald.config().folder.clone();
    write(&folder, "owner/restart.toml", "description = \"Restart the whole bot\"\n");
    bot.herald.reload("owner").await.unwrap();

    let after = bot.remote.find(owner_guild, "owner").unwrap();
    assert_eq!(after.id, before.id);
    assert_eq!(
        after.data.options[0].description,
        "Restart the whole bot"
    );
    assert_eq!(after.data.default_member_permissions.as_deref(), Some("0"));
    assert!(bot.remote.find(Scope::Default, "owner").is_none());

    let registry = bot.herald.synchronizer().registry();
    let command = registry.read().command("owner").unwrap();
    assert_eq!(command.options[0].description, "Restart the whole bot");
}

#[tokio::test]
async fn test_failed_debug_push_lets_the_next_guild_claim() {
    let bot = bot(|config| config.debug = true, |_| {}).await;
    bot.herald.start().await.unwrap();

    bot.remote.fail_next_replace_all(RemoteError::other("gateway closed"));
    assert!(bot.herald.on_guild_create(GuildId(5)).await.is_err());
    assert_eq!(bot.herald.main_scope(), None);

    bot.herald.on_guild_create(GuildId(6)).await.unwrap();
    assert_eq!(bot.herald.main_scope(), Some(Scope::Guild(GuildId(6))));
    assert!(bot.remote.find(Scope::Guild(GuildId(6)), "ping").is_some());
}
