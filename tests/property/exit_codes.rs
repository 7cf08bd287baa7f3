//! Exit-code totality over the error taxonomy.

use gplay::error::ErrorCode;
use gplay::exit_code::exit_code_for;
use proptest::prelude::*;
use std::collections::HashSet;

#[test]
fn test_every_code_has_a_distinct_exit_code() {
    let exits: HashSet<i32> = ErrorCode::ALL.iter().map(|c| c.exit_code()).collect();
    assert_eq!(exits.len(), ErrorCode::ALL.len());
    assert!(exits.iter().all(|code| (0..=8).contains(code)));
    for code in ErrorCode::ALL {
        assert_eq!(exit_code_for(code.as_str()), code.exit_code());
    }
}

proptest! {
    #[test]
    fn unknown_code_names_map_to_general_error(name in "[A-Za-z_]{0,24}") {
        prop_assume!(ErrorCode::parse(&name).is_none());
        prop_assert_eq!(exit_code_for(&name), 1);
    }

    #[test]
    fn exit_code_is_always_in_range(name in ".{0,32}") {
        let code = exit_code_for(&name);
        prop_assert!((0..=8).contains(&code));
    }
}
