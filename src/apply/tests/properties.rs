use proptest::prelude::*;

use crate::target::Histogram;

use super::super::evaluate;
use super::parse;

fn identifier() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,12}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_accept_all_evaluation_is_idempotent(name in identifier(), title in identifier()) {
        let exprs = parse("t; n; /.*/");
        let mut target = Histogram {
            title: title.clone(),
            ..Histogram::named(&name)
        };

        let first = evaluate(&exprs, &mut target).expect("evaluation");
        let second = evaluate(&exprs, &mut target).expect("evaluation");
        prop_assert!(first.accepted);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.group, name);
        prop_assert_eq!(target.title, title);
    }

    #[test]
    fn prop_latest_and_initial_versions_after_two_appends(
        original in identifier(),
        first in identifier(),
        second in identifier(),
    ) {
        let exprs = parse(&format!("t//{first}/; t//{second}/; t-1x; t0y"));
        let mut target = Histogram {
            title: original.clone(),
            ..Histogram::named("h")
        };

        evaluate(&exprs, &mut target).expect("evaluation");
        prop_assert_eq!(&target.x_title, &second);
        prop_assert_eq!(&target.y_title, &original);
        prop_assert_eq!(&target.title, &second);
    }

    #[test]
    fn prop_version_index_past_history_is_fatal(index in 2i8..=i8::MAX) {
        let exprs = parse(&format!("t//a/; t{index}//b/"));
        let mut target = Histogram::named("h");
        prop_assert!(evaluate(&exprs, &mut target).is_err());
    }

    #[test]
    fn prop_select_on_literal_prefix_matches_starts_with(
        name in identifier(),
        prefix in "[a-z]{1,3}",
    ) {
        let exprs = parse(&format!("s/^{prefix}/"));
        let mut target = Histogram::named(&name);
        let outcome = evaluate(&exprs, &mut target).expect("evaluation");
        prop_assert_eq!(outcome.accepted, name.starts_with(&prefix));
    }
}
