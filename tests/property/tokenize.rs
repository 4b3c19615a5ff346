use multirun::input::tokenize;
use proptest::prelude::*;

// Words are runs of visible ASCII (no spaces), like shell-style commands.
fn word() -> impl Strategy<Value = String> {
    "[!-~]{1,8}"
}

// Separators are one or more spaces.
fn separator() -> impl Strategy<Value = String> {
    (1..4usize).prop_map(|n| " ".repeat(n))
}

fn argv_of(line: &str) -> Vec<String> {
    tokenize(line.as_bytes())
        .map(|argv| {
            argv.as_slice()
                .iter()
                .map(|a| a.to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default()
}

proptest! {
    #[test]
    fn tokenize_matches_split_on_space_runs(
        words in proptest::collection::vec(word(), 1..8),
        seps in proptest::collection::vec(separator(), 8),
        leading in 0..3usize,
        newline in any::<bool>(),
    ) {
        let mut line = " ".repeat(leading);
        for (i, w) in words.iter().enumerate() {
            if i > 0 {
                line.push_str(&seps[i - 1]);
            }
            line.push_str(w);
        }
        if newline {
            line.push('\n');
        }

        let expected: Vec<String> = line
            .trim_end_matches('\n')
            .split(' ')
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();

        prop_assert_eq!(argv_of(&line), expected.clone());
        prop_assert_eq!(expected, words);
    }

    #[test]
    fn tokens_are_never_empty(line in "[ a-z\n]{0,40}") {
        for token in argv_of(&line) {
            prop_assert!(!token.is_empty());
            prop_assert!(!token.contains(' '));
        }
    }
}
