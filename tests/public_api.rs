use rstest::rstest;
use std::collections::BTreeSet;
use wnuteval::{
    entity_results, evaluate, evaluate_conf, phrase_confusion, segment, Delimiter, Entities,
    EntityType, EvalConfigBuilder, EvalError, Evaluation, MatchMode, ParsingError, Results, Token,
};

pub trait CloseEnough {
    fn are_close(&self, other: &Self, eps: f64) -> bool;
}

// Results holds floats, the derived PartialEq is too strict for computed ratios.
impl CloseEnough for Results {
    fn are_close(&self, other: &Self, eps: f64) -> bool {
        let counts_are_equal = (self.gold, self.guess, self.correct)
            == (other.gold, other.guess, other.correct);
        let precision_is_equal = f64::abs(self.precision - other.precision) < eps;
        let recall_is_equal = f64::abs(self.recall - other.recall) < eps;
        let f1_is_equal = f64::abs(self.f1 - other.f1) < eps;
        counts_are_equal && precision_is_equal && recall_is_equal && f1_is_equal
    }
}

fn sentence_entities(sent_id: usize, annotated: &[(&str, &str)]) -> Entities {
    let tokens: Vec<Token> = annotated
        .iter()
        .enumerate()
        .map(|(word_id, (word, label))| Token::try_new(*word, label, sent_id, word_id).unwrap())
        .collect();
    let (entities, warnings) = segment(&tokens).unwrap();
    assert!(warnings.is_empty());
    Entities::from(entities)
}

fn join(parts: Vec<Entities>) -> Entities {
    parts.into_iter().flatten().collect()
}

#[test]
fn identical_annotations_score_perfectly() {
    let evaluation = evaluate(vec![
        "Barack\tB-person\tB-person",
        "Obama\tI-person\tI-person",
        "visited\tO\tO",
        "Paris\tB-location\tB-location",
    ])
    .unwrap();
    for report in [&evaluation.entity, &evaluation.surface_form] {
        assert!(report
            .overall
            .are_close(&Results::from_counts(2, 2, 2), 1e-9));
        assert_eq!(report.overall.f1, 1.0);
        let rows: Vec<(EntityType, usize)> = report
            .types
            .iter()
            .map(|t| (t.entity_type, t.results.correct))
            .collect();
        assert_eq!(
            rows,
            vec![(EntityType::Location, 1), (EntityType::Person, 1)]
        );
    }
    assert!(evaluation.warnings.is_empty());
}

#[rstest]
#[case("I-location", 0)]
#[case("O", 1)]
fn exact_matching_requires_the_same_span(#[case] city: &str, #[case] expected_correct: usize) {
    let line = format!("City\tO\t{city}");
    let evaluation = evaluate(vec![
        "New\tB-location\tB-location",
        "York\tI-location\tI-location",
        line.as_str(),
    ])
    .unwrap();
    let overall = evaluation.entity.overall;
    assert_eq!(overall.correct, expected_correct);
    assert_eq!(overall.precision, expected_correct as f64);
    assert_eq!(overall.recall, expected_correct as f64);
}

#[test]
fn i_after_o_is_a_warning() {
    let evaluation = evaluate(vec![
        "in\tO\tO",
        "Paris\tB-location\tI-location",
        "today\tO\tO",
    ])
    .unwrap();
    assert_eq!(evaluation.warnings.len(), 1);
    let warning = &evaluation.warnings[0];
    assert_eq!(warning.previous.word(), "in");
    assert_eq!(warning.token.word(), "Paris");
    // The recovered entity starts at the I token and matches the gold entity.
    assert_eq!(evaluation.entity.overall.correct, 1);
    assert_eq!(evaluation.surface_form.overall.correct, 1);
}

#[test]
fn invalid_bio_marker_is_a_format_error() {
    let err = evaluate(vec!["a\tO\tO", "", "b\tO\tO", "Paris\tX-location\tO"]).unwrap_err();
    match err {
        EvalError::Format(e) => {
            assert_eq!(e.word, "Paris");
            assert_eq!(e.tag, "X-location");
            assert_eq!((e.sent_id, e.word_id), (1, 1));
            assert_eq!(e.source, ParsingError::Prefix(String::from("X")));
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[rstest]
#[case("Paris\tB-city\tO")]
#[case("Paris\tB\tO")]
#[case("Paris\tO-location\tO")]
#[case("Paris")]
fn malformed_lines_are_rejected(#[case] line: &str) {
    let err = evaluate(vec![line]).unwrap_err();
    assert!(matches!(err, EvalError::Format(_)));
}

#[test]
fn surface_forms_ignore_sentence_order() {
    let gold = join(vec![
        sentence_entities(0, &[("Paris", "B-location"), ("is", "O")]),
        sentence_entities(1, &[("Rome", "B-location")]),
    ])
    .tagged();
    // Same entities, with the sentences swapped.
    let guess = join(vec![
        sentence_entities(0, &[("Rome", "B-location")]),
        sentence_entities(1, &[("Paris", "B-location"), ("is", "O")]),
    ])
    .tagged();
    let surface = entity_results(&gold, &guess, MatchMode::SurfaceForm);
    assert!(surface.are_close(&Results::from_counts(2, 2, 2), 1e-9));
    let exact = entity_results(&gold, &guess, MatchMode::Exact);
    assert!(exact.are_close(&Results::from_counts(2, 2, 0), 1e-9));
}

#[test]
fn reordering_whole_sentences_keeps_every_count() {
    let first = ["Apple\tB-corporation\tB-corporation", "rocks\tO\tO"];
    let second = ["Lady\tB-person\tB-person", "Gaga\tI-person\tO"];
    let third = ["Apple\tB-corporation\tO"];
    let render = |sentences: [&[&str]; 3]| -> Evaluation {
        let lines: Vec<&str> = sentences
            .iter()
            .flat_map(|s| s.iter().copied().chain(std::iter::once("")))
            .collect();
        evaluate(lines).unwrap()
    };
    let a = render([&first[..], &second[..], &third[..]]);
    let b = render([&third[..], &first[..], &second[..]]);
    assert_eq!(a.surface_form, b.surface_form);
    assert_eq!(a.entity.overall, b.entity.overall);
    // Two mentions of Apple in gold are a single surface form.
    assert_eq!(a.surface_form.overall.gold, 2);
    assert_eq!(a.entity.overall.gold, 3);
}

#[test]
fn scores_the_selected_system() {
    let lines = vec!["Paris O B-location O", "is O O O"];
    let config = EvalConfigBuilder::new()
        .delimiter(Delimiter::Whitespace)
        .system(2)
        .build();
    let evaluation = evaluate_conf(lines.clone(), &config).unwrap();
    assert_eq!(evaluation.entity.tokens.correct, 2);
    assert_eq!(evaluation.entity.overall.guess, 0);

    let config = EvalConfigBuilder::new()
        .delimiter(Delimiter::Whitespace)
        .system(3)
        .build();
    let err = evaluate_conf(lines, &config).unwrap_err();
    assert_eq!(
        err,
        EvalError::MissingSystem {
            index: 3,
            available: 2
        }
    );
}

#[test]
fn phrases_need_an_exact_entity_match() {
    let gold = sentence_entities(0, &[("Lady", "B-person"), ("Gaga", "I-person")]).tagged();
    let guess = sentence_entities(0, &[("Lady", "B-group"), ("Gaga", "I-group")]).tagged();
    let universe = join(vec![gold.clone(), guess.clone()]);
    let confusion = phrase_confusion(&gold, &guess, &universe);
    assert!(confusion.true_positive.is_empty());
    assert_eq!(confusion.false_positive.len(), 1);
    assert_eq!(confusion.false_negative.len(), 1);
    assert!(confusion.true_negative.is_empty());

    let confusion = phrase_confusion(&gold, &gold, &universe);
    assert_eq!(confusion.true_positive.len(), 1);
    assert!(confusion.false_positive.is_empty());
    assert!(confusion.false_negative.is_empty());
}

#[test]
fn unscored_system_columns_may_be_uneven() {
    let evaluation = evaluate(vec!["Paris\tB-location\tB-location", "is\tO\tO\tO"]).unwrap();
    assert_eq!(evaluation.entity.overall.correct, 1);
    assert_eq!(evaluation.entity.tokens.correct, 2);

    let config = EvalConfigBuilder::new().system(2).build();
    let err = evaluate_conf(vec!["Paris\tB-location\tB-location", "is\tO\tO\tO"], &config)
        .unwrap_err();
    assert_eq!(
        err,
        EvalError::InconsistentColumns {
            sent_id: 0,
            word_id: 0,
            expected: 3,
            found: 2
        }
    );
}

#[test]
fn json_output_has_both_reports() {
    let evaluation = evaluate(vec!["Paris\tB-location\tB-location"]).unwrap();
    let value = serde_json::to_value(&evaluation).unwrap();
    assert_eq!(value["entity"]["overall"]["correct"], 1);
    assert_eq!(value["surface_form"]["types"][0]["entity_type"], "location");
    let keys: BTreeSet<&str> = value
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, BTreeSet::from(["entity", "surface_form"]));
}
