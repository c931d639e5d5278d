mod common;

use std::collections::{HashMap, HashSet};

use proptest::prelude::*;

use builddag::graph::GraphBuilder;

use common::mock_context;

/// Random acyclic dependency lists: target `i` may only depend on targets
/// declared before it.
fn dep_lists_strategy(max_targets: usize) -> impl Strategy<Value = Vec<Vec<usize>>> {
    (1..=max_targets).prop_flat_map(|n| {
        proptest::collection::vec(proptest::collection::vec(any::<usize>(), 0..n), n).prop_map(
            move |raw| {
                raw.into_iter()
                    .enumerate()
                    .map(|(i, potential)| {
                        let mut deps: HashSet<usize> = HashSet::new();
                        for d in potential {
                            if i > 0 {
                                deps.insert(d % i);
                            }
                        }
                        deps.into_iter().collect()
                    })
                    .collect()
            },
        )
    })
}

fn name(i: usize) -> String {
    format!("t{i}")
}

proptest! {
    #[test]
    fn resolution_orders_every_dependency_first(deps in dep_lists_strategy(8)) {
        let (_runner, ctx) = mock_context();

        let mut b = GraphBuilder::new();
        for i in 0..deps.len() {
            b.target(&name(i)).executes(|_ctx| Ok(()));
        }
        for (i, list) in deps.iter().enumerate() {
            let dep_names: Vec<String> = list.iter().map(|&d| name(d)).collect();
            b.target(&name(i))
                .depends_on(dep_names.iter().map(String::as_str));
        }

        let graph = b.build().unwrap();
        let requested = name(deps.len() - 1);
        let plan: Vec<String> = graph
            .plan(&requested, &ctx)
            .unwrap()
            .into_iter()
            .map(String::from)
            .collect();

        // The plan is exactly the transitive closure of the requested
        // target, each member once.
        let mut expected: HashSet<usize> = HashSet::new();
        let mut stack = vec![deps.len() - 1];
        while let Some(i) = stack.pop() {
            if expected.insert(i) {
                stack.extend(deps[i].iter().copied());
            }
        }
        let planned: HashSet<String> = plan.iter().cloned().collect();
        prop_assert_eq!(plan.len(), planned.len(), "duplicates in {:?}", plan);
        prop_assert_eq!(
            planned,
            expected.iter().map(|&i| name(i)).collect::<HashSet<_>>()
        );

        // Every dependency appears strictly before its dependent.
        let positions: HashMap<&str, usize> = plan
            .iter()
            .enumerate()
            .map(|(pos, n)| (n.as_str(), pos))
            .collect();
        for &i in &expected {
            for &d in &deps[i] {
                let dep_name = name(d);
                let target_name = name(i);
                prop_assert!(
                    positions[dep_name.as_str()] < positions[target_name.as_str()],
                    "{} must precede {} in {:?}",
                    dep_name,
                    target_name,
                    plan
                );
            }
        }
    }
}
