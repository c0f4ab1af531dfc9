use std::collections::HashMap;

use coherence_filter::hierarchy::HierarchyBuilder;
use coherence_filter::models::{Item, Position, Score, VisibilityDecision};
use coherence_filter::scoring::Scorer;
use coherence_filter::visibility::VisibilityEngine;
use proptest::prelude::*;

fn text_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        ".{0,200}",
        "[a-zA-Z!?. ']{0,120}",
        Just("you are an idiot, WAKE UP SHEEP!!!!".to_string()),
        Just("I appreciate the nuanced context and evidence here?".to_string()),
    ]
}

fn layout_strategy() -> impl Strategy<Value = Vec<Item>> {
    prop::collection::vec((-50.0f64..500.0, 0.0f64..120.0), 0..25).prop_map(|positions| {
        positions
            .into_iter()
            .enumerate()
            .map(|(i, (top, left))| Item::new(format!("c{}", i), "", Position::new(top, left)))
            .collect()
    })
}

proptest! {
    #[test]
    fn score_components_stay_in_range(text in text_strategy()) {
        let score = Scorer::default().score(&text);
        prop_assert!((0.0..=1.0).contains(&score.coherence));
        prop_assert!((0.0..=1.0).contains(&score.entropy));
        prop_assert!((-1.0..=1.0).contains(&score.moral_value));
        prop_assert!((score.moral_value - (score.coherence - score.entropy)).abs() < 1e-9);
    }

    #[test]
    fn scoring_is_deterministic(text in text_strategy()) {
        let scorer = Scorer::default();
        prop_assert_eq!(scorer.score(&text), scorer.score(&text));
    }

    #[test]
    fn geometric_hierarchy_has_no_cycles(items in layout_strategy()) {
        let hierarchy = HierarchyBuilder::new().build(&items);
        let by_id: HashMap<&str, &Item> = items.iter().map(|i| (i.id.as_str(), i)).collect();

        for item in &items {
            let mut current = item.id.as_str();
            let mut steps = 0;
            while let Some(parent) = hierarchy.parent_of(current) {
                let (child, parent_item) = (by_id[current], by_id[parent]);
                prop_assert!(parent_item.position.top < child.position.top);
                prop_assert!(parent_item.position.left < child.position.left);
                current = parent;
                steps += 1;
                prop_assert!(steps <= items.len());
            }
        }
    }

    #[test]
    fn raising_threshold_never_reveals_items(
        (items, morals) in layout_strategy().prop_flat_map(|items| {
            let n = items.len();
            (Just(items), prop::collection::vec(prop::option::weighted(0.8, -1.0f64..=1.0), n))
        }),
        low in -1.0f64..=1.0,
        delta in 0.0f64..=1.0,
    ) {
        // 部分评论未评分，层级来自几何推断，提升逻辑会沿父链行走
        let scores: HashMap<String, Score> = items
            .iter()
            .zip(morals.iter().copied())
            .filter_map(|(item, m)| {
                m.map(|m| (item.id.clone(), Score::from_components(m.max(0.0), (-m).max(0.0))))
            })
            .collect();
        let hierarchy = HierarchyBuilder::new().build(&items);
        let engine = VisibilityEngine::new();

        let high = (low + delta).min(1.0);
        for recursive_lift in [true, false] {
            let at_low = engine.decide(&items, &scores, &hierarchy, low, recursive_lift);
            let at_high = engine.decide(&items, &scores, &hierarchy, high, recursive_lift);

            for item in &items {
                if at_high[&item.id].visible {
                    prop_assert!(at_low[&item.id].visible);
                }
                if !recursive_lift {
                    prop_assert_eq!(at_low[&item.id].lift_depth, None);
                }
            }
        }
    }

    #[test]
    fn lift_depth_counts_buried_chain(k in 1usize..12) {
        // 根评论达标，中间 k 层低于阈值，最后一条达标
        let mut items = vec![Item::new("root", "", Position::new(0.0, 0.0))];
        let mut scores = HashMap::new();
        scores.insert("root".to_string(), Score::from_components(0.9, 0.0));

        for depth in 1..=k {
            let id = format!("bad{}", depth);
            scores.insert(id.clone(), Score::from_components(0.1, 0.6));
            items.push(Item::new(id, "", Position::new(depth as f64, depth as f64)));
        }
        scores.insert("leaf".to_string(), Score::from_components(0.8, 0.1));
        items.push(Item::new("leaf", "", Position::new((k + 1) as f64, (k + 1) as f64)));

        let hierarchy = HierarchyBuilder::new().build(&items);
        let decisions = VisibilityEngine::new().decide(&items, &scores, &hierarchy, 0.0, true);

        prop_assert_eq!(decisions["leaf"], VisibilityDecision::lifted(k));
        prop_assert_eq!(decisions["root"], VisibilityDecision::shown());
        for depth in 1..=k {
            prop_assert_eq!(decisions[&format!("bad{}", depth)], VisibilityDecision::hidden());
        }
    }
}
