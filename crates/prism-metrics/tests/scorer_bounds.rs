use prism_core::scoring::Scorer;
use prism_metrics::default_metrics;
use proptest::prelude::*;

fn scorer() -> Scorer {
    Scorer::new(default_metrics()).expect("default metrics cover every dimension")
}

proptest! {
    #[test]
    fn scores_stay_in_range_and_aggregate_is_mean(
        prompt in "[a-zA-Z ,.:-]{0,200}",
        completion in "[a-zA-Z0-9 #*\\n.,:!?-]{0,800}",
    ) {
        let s = scorer().score(&prompt, &completion);
        for v in [s.quality, s.clarity, s.completeness, s.relevance, s.aggregate] {
            prop_assert!((0.0..=10.0).contains(&v), "out of range: {}", v);
        }
        let mean = (s.quality + s.clarity + s.completeness + s.relevance) / 4.0;
        prop_assert!((s.aggregate - mean).abs() < 1e-9);
    }

    #[test]
    fn scoring_is_deterministic(completion in "[a-z .]{1,300}") {
        let a = scorer().score("Explain photosynthesis to a child", &completion);
        let b = scorer().score("Explain photosynthesis to a child", &completion);
        prop_assert_eq!(a, b);
    }
}

#[test]
fn structured_on_topic_answer_beats_a_one_liner() {
    let prompt = "Explain photosynthesis in plants";
    let structured = "# Photosynthesis\n\n\
        First, plants absorb sunlight through chlorophyll in their leaves. \
        Second, they take in carbon dioxide from the air and water from the soil. \
        For example, a leaf uses light energy to split water molecules:\n\
        * 1. Light reactions produce ATP and oxygen.\n\
        * 2. The Calvin cycle builds glucose from carbon dioxide.\n\n\
        To explain it simply, photosynthesis turns light, water and carbon dioxide into sugar and oxygen, \
        which is how plants store energy and feed nearly every food chain on Earth.";
    let one_liner = "it is a thing";

    let s = scorer();
    let good = s.score(prompt, structured);
    let weak = s.score(prompt, one_liner);

    assert!(good.note.is_none());
    assert!(good.aggregate > weak.aggregate);
    assert_eq!(good.relevance, 10.0);
    assert_eq!(good.clarity, 10.0);
}

#[test]
fn whitespace_completion_is_zeroed_with_note() {
    let s = scorer().score("Explain photosynthesis in plants", " \n\t ");
    assert_eq!(s.aggregate, 0.0);
    assert!(s.note.is_some());
}
