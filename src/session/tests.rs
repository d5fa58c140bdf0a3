use super::{Event, Session, SessionAction, SessionState};
use crate::config::Config;
use crate::error::CommandError;
use slirc_proto::{Command, Message};

fn config() -> Config {
    "[identity]\nnickname = \"me\"\n\n[chat]\nchannels = []".parse().unwrap()
}

fn line(s: &str) -> Message {
    s.parse().unwrap()
}

fn sent(actions: &[SessionAction]) -> Vec<String> {
    actions
        .iter()
        .filter_map(|a| match a {
            SessionAction::Send(msg) => Some(msg.to_string().trim_end().to_string()),
            _ => None,
        })
        .collect()
}

fn events(actions: Vec<SessionAction>) -> Vec<Event> {
    actions
        .into_iter()
        .filter_map(|a| match a {
            SessionAction::Emit(ev) => Some(ev),
            _ => None,
        })
        .collect()
}

/// A session registered as `me` on epoch 1.
fn ready() -> Session {
    let mut session = Session::new(config());
    let _ = session.connect();
    let _ = session.transport_opened(1);
    let _ = session.handle_message(1, &line(":irc.test 001 me :Welcome"));
    session
}

/// A ready session that has joined `#test` with members alice and bob.
fn in_channel() -> Session {
    let mut session = ready();
    let _ = session.handle_message(1, &line(":me!u@h JOIN #test"));
    let _ = session.handle_message(1, &line(":irc.test 353 me = #test :@me alice +bob"));
    let _ = session.handle_message(1, &line(":irc.test 366 me #test :End of NAMES"));
    session
}

fn roster(session: &Session, channel: &str) -> Vec<String> {
    session
        .connection()
        .and_then(|c| c.target(channel))
        .map(|t| t.roster().nicknames().into_iter().map(String::from).collect())
        .unwrap_or_default()
}

#[test]
fn test_connect_queues_registration() {
    let mut session = Session::new(config());
    let actions = session.connect();

    assert!(matches!(actions[0], SessionAction::Emit(Event::Connecting { .. })));
    assert_eq!(
        actions[1],
        SessionAction::Open {
            host: "irc.freenode.net".into(),
            port: 6667,
            epoch: 1
        }
    );
    assert_eq!(sent(&actions), vec!["NICK me", "USER me 0 * :me"]);
    assert_eq!(session.state(), SessionState::Connecting);
}

#[test]
fn test_connect_is_idempotent() {
    let mut session = Session::new(config());
    let _ = session.connect();
    assert!(session.connect().is_empty());
    let _ = session.transport_opened(1);
    assert!(session.connect().is_empty());
    assert_eq!(session.epoch(), Some(1));
}

#[test]
fn test_registration_flow() {
    let mut session = Session::new(config());
    let _ = session.connect();
    let _ = session.transport_opened(1);
    assert_eq!(session.state(), SessionState::Registering);

    let actions = session.handle_message(1, &line(":irc.test 001 me_ :Welcome to IRC"));
    assert_eq!(session.state(), SessionState::Ready);
    assert_eq!(
        events(actions),
        vec![Event::Welcome {
            nickname: "me_".into()
        }]
    );
    assert_eq!(session.connection().unwrap().nickname(), "me_");
}

#[test]
fn test_welcome_autojoins() {
    let config: Config = "[identity]\nnickname = \"me\"\n[chat]\nchannels = [\"#a\", \"#b\"]"
        .parse()
        .unwrap();
    let mut session = Session::new(config);
    let _ = session.connect();
    let actions = session.handle_message(1, &line(":irc.test 001 me :Welcome"));
    assert_eq!(sent(&actions), vec!["JOIN #a", "JOIN #b"]);
}

#[test]
fn test_ping_answered() {
    let mut session = Session::new(config());
    let _ = session.connect();
    let actions = session.handle_message(1, &line("PING :irc.test"));
    assert_eq!(sent(&actions), vec!["PONG irc.test"]);
}

#[test]
fn test_join_requires_ready() {
    let mut session = Session::new(config());
    assert_eq!(session.join("#test"), Err(CommandError::NotConnected));
    let _ = session.connect();
    assert_eq!(session.join("#test"), Err(CommandError::NotRegistered));
}

#[test]
fn test_join_does_not_assume_success() {
    let mut session = ready();
    let actions = session.join("#test").unwrap();
    assert_eq!(sent(&actions), vec!["JOIN #test"]);
    assert!(session.connection().unwrap().target("#test").is_none());
}

#[test]
fn test_self_join_creates_target_and_requests_names() {
    let mut session = ready();
    let actions = session.handle_message(1, &line(":me!u@h JOIN #Test"));
    assert_eq!(sent(&actions), vec!["NAMES #Test"]);
    let target = session.connection().unwrap().target("#test").unwrap();
    assert_eq!(target.name(), "#Test");
    assert!(target.is_channel());
}

#[test]
fn test_names_replace_roster() {
    let session = in_channel();
    assert_eq!(roster(&session, "#test"), vec!["alice", "bob", "me"]);

    let conn = session.connection().unwrap();
    let bob = conn
        .target("#test")
        .unwrap()
        .roster()
        .get(conn.casemapping(), "BOB")
        .unwrap();
    assert_eq!(bob.mode, Some('+'));
}

#[test]
fn test_names_across_multiple_replies() {
    let mut session = ready();
    let _ = session.handle_message(1, &line(":me!u@h JOIN #big"));
    let _ = session.handle_message(1, &line(":irc.test 353 me = #big :a b"));
    let _ = session.handle_message(1, &line(":irc.test 353 me = #BIG :c"));
    let actions = session.handle_message(1, &line(":irc.test 366 me #big :End"));
    assert_eq!(roster(&session, "#big"), vec!["a", "b", "c"]);
    assert!(matches!(&events(actions)[0], Event::NamesList { entries, .. } if entries.len() == 3));
}

#[test]
fn test_names_for_unknown_target_dropped() {
    let mut session = ready();
    let _ = session.handle_message(1, &line(":irc.test 353 me = #nope :a b"));
    let actions = session.handle_message(1, &line(":irc.test 366 me #nope :End"));
    assert!(actions.is_empty());
    assert!(session.connection().unwrap().target("#nope").is_none());
}

#[test]
fn test_other_join_part_kick() {
    let mut session = in_channel();
    let _ = session.handle_message(1, &line(":carol!u@h JOIN #test"));
    assert!(roster(&session, "#test").contains(&"carol".to_string()));

    let _ = session.handle_message(1, &line(":carol!u@h PART #test :bye"));
    assert!(!roster(&session, "#test").contains(&"carol".to_string()));

    let actions = session.handle_message(1, &line(":alice!u@h KICK #test bob :out"));
    assert_eq!(roster(&session, "#test"), vec!["alice", "me"]);
    assert!(matches!(
        &events(actions)[0],
        Event::Kicked { by, is_self: false, .. } if by == "alice"
    ));
}

#[test]
fn test_self_part_removes_target() {
    let mut session = in_channel();
    let actions = session.handle_message(1, &line(":me!u@h PART #test"));
    assert!(matches!(&events(actions)[0], Event::Parted { is_self: true, .. }));
    assert!(session.connection().unwrap().target("#test").is_none());
}

#[test]
fn test_self_kick_removes_target() {
    let mut session = in_channel();
    let _ = session.handle_message(1, &line(":alice!u@h KICK #test me :bye"));
    assert!(session.connection().unwrap().target("#test").is_none());
}

#[test]
fn test_quit_removes_from_every_target() {
    let mut session = in_channel();
    let _ = session.handle_message(1, &line(":me!u@h JOIN #other"));
    let _ = session.handle_message(1, &line(":irc.test 353 me = #other :me alice"));
    let _ = session.handle_message(1, &line(":irc.test 366 me #other :End"));

    let actions = session.handle_message(1, &line(":alice!u@h QUIT :gone"));
    assert_eq!(roster(&session, "#test"), vec!["bob", "me"]);
    assert_eq!(roster(&session, "#other"), vec!["me"]);
    assert_eq!(
        events(actions),
        vec![Event::Quit {
            nickname: "alice".into(),
            reason: Some("gone".into()),
            targets: vec!["#other".into(), "#test".into()],
        }]
    );
}

#[test]
fn test_nick_change_keeps_mode_and_rekeys_private() {
    let mut session = in_channel();
    let _ = session.connection_mut().unwrap().open_private("bob");

    let actions = session.handle_message(1, &line(":bob!u@h NICK robert"));
    let conn = session.connection().unwrap();
    let entry = conn
        .target("#test")
        .unwrap()
        .roster()
        .get(conn.casemapping(), "robert")
        .unwrap();
    assert_eq!(entry.mode, Some('+'));
    assert!(conn.target("bob").is_none());
    assert_eq!(conn.target("robert").unwrap().name(), "robert");
    assert!(matches!(
        &events(actions)[0],
        Event::NickChanged { targets, is_self: false, .. } if targets == &["#test", "robert"]
    ));
}

#[test]
fn test_nick_change_onto_open_private_target_merges() {
    let mut session = in_channel();
    let _ = session.connection_mut().unwrap().open_private("bob");
    let _ = session.connection_mut().unwrap().open_private("Robert");

    let actions = session.handle_message(1, &line(":bob!u@h NICK robert"));
    let conn = session.connection().unwrap();
    assert!(conn.target("bob").is_none());
    assert_eq!(conn.target("robert").unwrap().name(), "robert");
    assert!(matches!(
        &events(actions)[0],
        Event::NickChanged { targets, merged: true, .. } if targets == &["#test", "robert"]
    ));
}

#[test]
fn test_self_nick_change() {
    let mut session = in_channel();
    let _ = session.handle_message(1, &line(":me!u@h NICK me2"));
    assert_eq!(session.connection().unwrap().nickname(), "me2");
    assert!(roster(&session, "#test").contains(&"me2".to_string()));
}

#[test]
fn test_registration_failure_keeps_state() {
    let mut session = Session::new(config());
    let _ = session.connect();
    let _ = session.transport_opened(1);
    let actions = session.handle_message(1, &line(":irc.test 433 * me :Nickname is already in use"));
    assert_eq!(session.state(), SessionState::Registering);
    match &events(actions)[0] {
        Event::RegistrationFailed(err) => {
            assert_eq!(err.code, 433);
            assert_eq!(err.text, "Nickname is already in use");
        }
        other => panic!("unexpected event {other:?}"),
    }

    let actions = session.nick("me_").unwrap();
    assert_eq!(sent(&actions), vec!["NICK me_"]);
    assert_eq!(session.connection().unwrap().nickname(), "me_");
}

#[test]
fn test_server_error_subject() {
    let mut session = ready();
    let actions = session.handle_message(1, &line(":irc.test 403 me #gone :No such channel"));
    assert_eq!(
        events(actions),
        vec![Event::ServerError {
            code: 403,
            subject: Some("#gone".into()),
            text: "No such channel".into(),
        }]
    );
}

#[test]
fn test_error_tears_down() {
    let mut session = in_channel();
    let actions = session.handle_message(1, &line("ERROR :Closing Link"));
    assert_eq!(actions[0], SessionAction::Close { epoch: 1 });
    assert_eq!(
        events(actions),
        vec![Event::Disconnected {
            reason: Some("Closing Link".into()),
            targets: vec!["#test".into()],
        }]
    );
    assert_eq!(session.state(), SessionState::Disconnected);
    assert!(session.connection().is_none());
}

#[test]
fn test_disconnect_sends_quit_first() {
    let mut session = ready();
    let actions = session.disconnect();
    assert!(matches!(&actions[0], SessionAction::Send(m) if matches!(m.command, Command::QUIT(None))));
    assert_eq!(actions[1], SessionAction::Close { epoch: 1 });
    assert!(session.disconnect().is_empty());
}

#[test]
fn test_stale_epoch_dropped() {
    let mut session = ready();
    let _ = session.disconnect();
    let _ = session.connect();
    assert_eq!(session.epoch(), Some(2));

    // Late traffic from the first connection.
    assert!(session.handle_message(1, &line(":irc.test 001 me :Welcome")).is_empty());
    assert!(session.transport_closed(1, None).is_empty());
    assert_eq!(session.state(), SessionState::Connecting);
}

#[test]
fn test_casemapping_switch() {
    let mut session = ready();
    let _ = session.handle_message(1, &line(":me!u@h JOIN #a[1]"));
    assert!(session.connection().unwrap().target("#A{1}").is_some());

    let _ = session.handle_message(1, &line(":irc.test 005 me CASEMAPPING=ascii :are supported"));
    let conn = session.connection().unwrap();
    assert!(conn.target("#A{1}").is_none());
    assert!(conn.target("#A[1]").is_some());
}

#[test]
fn test_casemapping_switch_mid_names() {
    let mut session = ready();
    let _ = session.handle_message(1, &line(":me!u@h JOIN #A[1]"));
    let _ = session.handle_message(1, &line(":irc.test 353 me = #A[1] :me alice bob"));
    let _ = session.handle_message(1, &line(":irc.test 005 me CASEMAPPING=ascii :are supported"));
    let actions = session.handle_message(1, &line(":irc.test 366 me #A[1] :End"));

    assert!(matches!(&events(actions)[0], Event::NamesList { entries, .. } if entries.len() == 3));
    assert_eq!(roster(&session, "#a[1]"), vec!["alice", "bob", "me"]);
}

#[test]
fn test_isupport_prefix_symbols() {
    let mut session = ready();
    let _ = session.handle_message(1, &line(":irc.test 005 me PREFIX=(qov)~@+ :are supported"));
    let _ = session.handle_message(1, &line(":me!u@h JOIN #test"));
    let _ = session.handle_message(1, &line(":irc.test 353 me = #test :~owner &notprefix"));
    let _ = session.handle_message(1, &line(":irc.test 366 me #test :End"));
    assert_eq!(roster(&session, "#test"), vec!["&notprefix", "owner"]);
}
