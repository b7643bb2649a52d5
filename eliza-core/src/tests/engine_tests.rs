use crate::*;

fn engine(source: &str) -> ConversationEngine {
    ConversationEngine::new(Script::load(source).unwrap())
}

fn reply(engine: &mut ConversationEngine, line: &str) -> String {
    engine.respond(line).join(" / ")
}

#[test]
fn test_because_you_bother_me() {
    let mut eliza = engine("(HELLO) (YOU (0 YOU 0 = WHY DO YOU SAY 3)) (NONE ((0) (TELL ME MORE))) ()");
    assert_eq!(eliza.greeting(), "HELLO");
    assert_eq!(reply(&mut eliza, "because you bother me"), "WHY DO YOU SAY BOTHER ME");
}

#[test]
fn test_equal_precedence_keeps_first_keyword() {
    let source = r#"
        (HI)
        (APPLE ((0) (APPLE FIRST)))
        (PEAR ((0) (PEAR FIRST)))
        (FIG 3 ((0) (FIG WINS)))
        (KIWI 3 ((0) (KIWI WINS)))
        (NONE ((0) (GO ON)))
        ()"#;
    let mut eliza = engine(source);
    assert_eq!(reply(&mut eliza, "apple and pear"), "APPLE FIRST");
    assert_eq!(reply(&mut eliza, "pear and apple"), "PEAR FIRST");
    assert_eq!(reply(&mut eliza, "fig then kiwi"), "FIG WINS");
    assert_eq!(reply(&mut eliza, "kiwi then fig"), "KIWI WINS");
}

#[test]
fn test_higher_precedence_replaces_selection() {
    let source = "(HI) (APPLE ((0) (APPLE))) (FIG 3 ((0) (FIG))) ()";
    let mut eliza = engine(source);
    assert_eq!(reply(&mut eliza, "apple fig"), "FIG");
    assert_eq!(reply(&mut eliza, "fig apple"), "FIG");
}

#[test]
fn test_rotation_cycles_and_selects_acknowledgement() {
    // No NONE rules, so every unmatched turn is acknowledged
    let mut eliza = engine("(HI) (YOU ((0 YOU) (OK))) ()");
    assert_eq!(eliza.rotation(), 1);

    let replies: Vec<_> = (0..5).map(|_| reply(&mut eliza, "nothing here")).collect();
    assert_eq!(
        replies,
        ["HMMM", "GO ON , PLEASE", "I SEE", "PLEASE CONTINUE", "HMMM"]
    );
    assert_eq!(eliza.rotation(), 2);

    // A keyword whose rules all fail also lands on an acknowledgement
    assert_eq!(reply(&mut eliza, "you there"), "GO ON , PLEASE");
}

#[test]
fn test_command_markers_are_rejected() {
    let mut eliza = engine("(HI) (NONE ((0) (GO ON))) ()");
    assert_eq!(reply(&mut eliza, "+ edit the script"), "THAT COMMAND IS NOT SUPPORTED");
    assert_eq!(reply(&mut eliza, "* (NEW RULE)"), "THAT COMMAND IS NOT SUPPORTED");
    assert_eq!(eliza.rotation(), 1);
    assert_eq!(reply(&mut eliza, "plain words"), "GO ON");
    assert_eq!(eliza.rotation(), 2);
}

#[test]
fn test_blank_line_ends_session() {
    let mut eliza = engine("(HI) (NONE ((0) (GO ON))) ()");
    assert_eq!(reply(&mut eliza, "hello"), "GO ON");
    assert_eq!(eliza.respond("   "), ["ELIZA ENDS..."]);
    assert!(eliza.is_finished());
    assert!(eliza.respond("anyone there").is_empty());
}

#[test]
fn test_punctuation_only_line_is_a_turn() {
    let mut eliza = engine("(HI) (NONE ((0) (GO ON))) ()");
    assert_eq!(eliza.respond("?"), ["GO ON"]);
    assert_eq!(eliza.respond("!! ;"), ["GO ON"]);
    assert!(!eliza.is_finished());
    assert_eq!(eliza.rotation(), 3);

    let mut eliza = engine("(HI) (YOU ((0 YOU 0) (OK))) ()");
    assert_eq!(eliza.respond("\"?\""), ["HMMM"]);
    assert_eq!(eliza.respond(" \t "), ["ELIZA ENDS..."]);
}

#[test]
fn test_memory_is_queued_and_replayed_on_fourth_count() {
    let source = r#"
        (HI)
        (MY = YOUR ((0 YOUR 0) (WHY YOUR 3)))
        (MEMORY MY
            (0 YOUR 0 = ONE 3)
            (0 YOUR 0 = TWO 3)
            (0 YOUR 0 = THREE 3)
            (0 YOUR 0 = FOUR 3))
        (NONE ((0) (GO ON)))
        ()"#;
    let mut eliza = engine(source);

    assert_eq!(reply(&mut eliza, "my cat sleeps"), "WHY YOUR CAT SLEEPS");
    assert_eq!(eliza.memory_len(), 1);
    assert_eq!(reply(&mut eliza, "nothing"), "GO ON");
    assert_eq!(eliza.rotation(), 3);
    assert_eq!(reply(&mut eliza, "nothing"), "ONE CAT SLEEPS");
    assert_eq!(eliza.memory_len(), 0);
    assert_eq!(reply(&mut eliza, "nothing"), "GO ON");
    assert_eq!(reply(&mut eliza, "nothing"), "GO ON");

    // The last input word picks the rule; memories replay oldest first
    assert_eq!(reply(&mut eliza, "my hat"), "WHY YOUR HAT");
    assert_eq!(reply(&mut eliza, "my car"), "WHY YOUR CAR");
    assert_eq!(eliza.memory_len(), 2);
    for _ in 0..3 {
        assert_eq!(reply(&mut eliza, "weather"), "GO ON");
    }
    assert_eq!(reply(&mut eliza, "weather"), "FOUR HAT");
    assert_eq!(eliza.memory_len(), 1);
}

#[test]
fn test_substitution_rewrites_each_occurrence_once() {
    let source = r#"
        (HI)
        (I = YOU ((0 YOU 0) (YOU SAID YOU 3)))
        (YOU = I ((0 I 0) (I 3)))
        (ME = YOU)
        ()"#;
    let mut eliza = engine(source);
    assert_eq!(reply(&mut eliza, "i like you"), "YOU SAID YOU LIKE I");
    assert_eq!(reply(&mut eliza, "you tell me"), "I TELL YOU");
}

#[test]
fn test_substitution_reaches_every_occurrence() {
    let mut eliza = engine("(HI) (MY = YOUR ((0 YOUR 0) (SO 1 YOUR 3))) ()");
    assert_eq!(
        reply(&mut eliza, "my dog and my cat"),
        "SO YOUR DOG AND YOUR CAT"
    );
}

#[test]
fn test_delimiters_trim_the_input() {
    let source = r#"
        (HI)
        (YOU ((0 YOU 0) (BEFORE 1 AFTER 3)))
        (NONE ((0) (SAID 1)))
        ()"#;
    let mut eliza = engine(source);
    assert_eq!(
        reply(&mut eliza, "well, you are nice. but never mind"),
        "BEFORE AFTER ARE NICE"
    );
    assert_eq!(reply(&mut eliza, "hello, there"), "SAID THERE");
    assert_eq!(reply(&mut eliza, "tired but you are here"), "BEFORE AFTER ARE HERE");
    assert_eq!(reply(&mut eliza, "hello and there"), "SAID HELLO AND THERE");
}

#[test]
fn test_delimiters_come_from_config() {
    let config = EngineConfig {
        delimiters: vec!["AND".into()],
        ..EngineConfig::default()
    };
    let script = Script::load("(HI) (NONE ((0) (SAID 1))) ()").unwrap();
    let mut eliza = ConversationEngine::with_config(script, config);
    assert_eq!(reply(&mut eliza, "hello and there"), "SAID THERE");
    assert_eq!(reply(&mut eliza, "hello, there"), "SAID HELLO , THERE");
}

#[test]
fn test_redirects() {
    let source = r#"
        (HI)
        (HOW (=WHAT))
        (WHAT ((0) (WHY DO YOU ASK)))
        (WHO (=NOBODY))
        (LOOP (=LOOP))
        (WHY ((0 WHY NOT) (NOT THAT)) (=WHAT))
        ()"#;
    let mut eliza = engine(source);
    assert_eq!(reply(&mut eliza, "how come"), "WHY DO YOU ASK");
    assert_eq!(reply(&mut eliza, "who knows"), "GO ON , PLEASE");
    assert_eq!(reply(&mut eliza, "loop"), "I SEE");
    assert_eq!(reply(&mut eliza, "why not"), "NOT THAT");
    assert_eq!(reply(&mut eliza, "why me"), "WHY DO YOU ASK");
}

#[test]
fn test_redirect_bound_is_configurable() {
    let config = EngineConfig {
        max_redirects: 1,
        ..EngineConfig::default()
    };
    let script = Script::load("(HI) (A (=B)) (B (=C)) (C ((0) (REACHED C))) ()").unwrap();
    let mut eliza = ConversationEngine::with_config(script, config);
    assert_eq!(reply(&mut eliza, "a"), "HMMM");
    assert_eq!(reply(&mut eliza, "b"), "REACHED C");
    assert_eq!(reply(&mut eliza, "c"), "REACHED C");
}

#[test]
fn test_reassembly_rotates_round_robin() {
    let mut eliza = engine("(HI) (SORRY ((0) (A) (B) (C))) ()");
    let replies: Vec<_> = (0..4).map(|_| reply(&mut eliza, "sorry")).collect();
    assert_eq!(replies, ["A", "B", "C", "A"]);
}

#[test]
fn test_out_of_range_capture_placeholder() {
    let mut eliza = engine("(HI) (YOU ((0 YOU 0) (YOU 7))) ()");
    assert_eq!(reply(&mut eliza, "you there"), "YOU ?????");

    let config = EngineConfig {
        placeholder: "<?>".into(),
        ..EngineConfig::default()
    };
    let script = Script::load("(HI) (YOU ((0 YOU 0) (YOU 7))) ()").unwrap();
    let mut eliza = ConversationEngine::with_config(script, config);
    assert_eq!(reply(&mut eliza, "you there"), "YOU <?>");
}

#[test]
fn test_pre_rebuilds_input_before_linking() {
    let source = r#"
        (HI)
        (YOU'RE = I'M ((0 I'M 0) (PRE (I ARE 3) (=YOU))))
        (YOU = I ((0 I ARE 0) (WHAT MAKES YOU THINK I AM 4)))
        ()"#;
    let mut eliza = engine(source);
    assert_eq!(reply(&mut eliza, "you're sad"), "WHAT MAKES YOU THINK I AM SAD");
}

#[test]
fn test_transitions_step_by_step() {
    let mut eliza = engine("(HI) (YOU ((0 YOU 0) (OK 3))) ()");
    // Nothing pending: the engine stays suspended
    assert_eq!(eliza.transition(State::AwaitInput), State::AwaitInput);
    assert_eq!(eliza.transition(State::NoMatch), State::AwaitInput);
    assert_eq!(eliza.transition(State::End), State::Halted);
    assert!(eliza.is_finished());
    assert_eq!(eliza.transition(State::Halted), State::Halted);
}

#[test]
fn test_run_over_scripted_console() {
    let mut eliza = engine("(HELLO THERE) (YOU ((0 YOU 0) (WHY 3))) (NONE ((0) (GO ON))) ()");
    let mut console = ScriptedConsole::new(["you said so", "ok"]);
    let transcript = eliza.run(&mut console).unwrap();

    assert_eq!(
        console.written(),
        ["HELLO THERE", "WHY SAID SO", "GO ON", "ELIZA ENDS..."]
    );
    assert_eq!(
        transcript.to_string(),
        "> HELLO THERE\n< you said so\n> WHY SAID SO\n< ok\n> GO ON\n< \n> ELIZA ENDS...\n"
    );
    assert_eq!(transcript.outputs().count(), 4);
}
