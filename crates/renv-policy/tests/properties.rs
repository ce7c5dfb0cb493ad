//! Property tests for the policy codec and patcher
//!
//! Generated documents cover the shapes the permission store can hand back:
//! multiple statements, mixed effects, and optional condition blocks.

use proptest::prelude::*;
use renv_policy::{is_equivalent, widen, Effect, PolicyDocument, Statement};
use std::net::IpAddr;

fn arb_effect() -> impl Strategy<Value = Effect> {
    prop_oneof![Just(Effect::Allow), Just(Effect::Deny)]
}

fn arb_statement() -> impl Strategy<Value = Statement> {
    (
        arb_effect(),
        "[a-z]{2,8}:[A-Za-z]{4,16}",
        "arn:aws:[a-z]{3,9}:us-west-2:111111111111:[a-z-]{4,20}/[a-z0-9-]{4,16}",
        proptest::option::of(("[A-Za-z]{4,12}", "aws:[A-Za-z]{4,12}", "[a-z0-9.-]{4,16}")),
    )
        .prop_map(|(effect, action, resource, condition)| {
            let mut statement = Statement::allow(action, resource);
            statement.effect = effect;
            if let Some((operator, key, value)) = condition {
                statement = statement.with_condition(operator, key, value);
            }
            statement
        })
}

fn arb_document() -> impl Strategy<Value = PolicyDocument> {
    proptest::collection::vec(arb_statement(), 1..4).prop_map(PolicyDocument::new)
}

fn arb_address() -> impl Strategy<Value = IpAddr> {
    any::<[u8; 4]>().prop_map(|octets| IpAddr::from(octets))
}

proptest! {
    #[test]
    fn codec_round_trip(document in arb_document()) {
        let raw = document.to_json().unwrap();
        let reparsed = PolicyDocument::from_json(&raw).unwrap();
        prop_assert_eq!(&reparsed, &document);
        prop_assert!(is_equivalent(&reparsed, &document));
    }

    #[test]
    fn document_is_equivalent_to_itself(document in arb_document()) {
        prop_assert!(is_equivalent(&document, &document));
    }

    #[test]
    fn widen_then_drop_is_identity(document in arb_document(), address in arb_address()) {
        // Skip documents the stale-statement guard refuses.
        prop_assume!(document.source_address_statement_count() == 0);

        let widened = widen(
            &document,
            "arn:aws:sagemaker:us-west-2:111111111111:notebook-instance/prop",
            "sagemaker:CreatePresignedNotebookInstanceUrl",
            address,
        ).unwrap();

        prop_assert_eq!(widened.statements.len(), document.statements.len() + 1);
        prop_assert!(!is_equivalent(&widened, &document));

        let mut reverted = widened;
        reverted.statements.pop();
        prop_assert!(is_equivalent(&reverted, &document));
    }

    #[test]
    fn widen_result_survives_the_wire(document in arb_document(), address in arb_address()) {
        prop_assume!(document.source_address_statement_count() == 0);

        let widened = widen(
            &document,
            "arn:aws:sagemaker:us-west-2:111111111111:notebook-instance/prop",
            "sagemaker:CreatePresignedNotebookInstanceUrl",
            address,
        ).unwrap();

        let reparsed = PolicyDocument::from_json(&widened.to_json().unwrap()).unwrap();
        prop_assert!(is_equivalent(&reparsed, &widened));
        prop_assert_eq!(reparsed.source_address_statement_count(), 1);
    }
}
