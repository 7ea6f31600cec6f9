use legend_engine::{
    apply_answer_filter, choose_best_question, guess_top_candidate, Answered, Candidate,
    DecisionTree, EngineConfig, EngineError, QuestionCatalogue, Session, SessionRequest,
    SharedTree, Split, TreeNode,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn mk(name: &str, team: &str, pos: &str) -> Candidate {
    let mut c = Candidate::new(name, name, team, pos);
    c.age = 25;
    c.height = 200.0;
    c.weight = 200.0;
    c.average_points = 10.0;
    c.average_assists = 3.0;
    c.average_rebounds = 4.0;
    c.average_steals = 1.0;
    c.average_blocks = 1.0;
    c
}

fn four_players() -> Vec<Candidate> {
    vec![
        mk("A", "Lakers", "G"),
        mk("B", "Lakers", "F"),
        mk("C", "Celtics", "G"),
        mk("D", "Celtics", "F"),
    ]
}

#[test]
fn team_split_is_discovered_before_equal_position_split() {
    // Below the enumeration threshold so the scored families actually compete.
    let catalogue = QuestionCatalogue::new(&EngineConfig {
        list_threshold: 3,
        ..EngineConfig::default()
    });
    let q = catalogue.choose(&four_players());
    assert!(
        matches!(q.meta, Split::Team { .. }),
        "expected a team question, got {q:?}"
    );
    assert!(
        q.question == "Is your player on the Lakers?"
            || q.question == "Is your player on the Celtics?"
    );
}

#[test]
fn four_players_under_default_threshold_are_enumerated() {
    let q = choose_best_question(&four_players());
    assert_eq!(q.question, "Is your player one of these: A, B, C, D?");
}

#[test]
fn lakers_answer_narrows_two_player_pool() {
    let pool = vec![mk("A", "Lakers", "G"), mk("B", "Celtics", "F")];
    let remaining = apply_answer_filter(&pool, "Is your player on the Lakers?", true);
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].team, "Lakers");
    let rest = apply_answer_filter(&pool, "Is your player on the Lakers?", false);
    assert!(rest.iter().all(|c| c.team != "Lakers"));
}

#[test]
fn decorated_player_is_guessed_out_of_three() {
    let mut star = mk("Star", "Lakers", "G");
    star.awards_count = 2;
    star.average_points = 30.0;
    let mut a = mk("A", "Lakers", "F");
    a.average_points = 0.0;
    let mut b = mk("B", "Heat", "C");
    b.average_points = 0.0;

    for pool in [
        vec![star.clone(), a.clone(), b.clone()],
        vec![a.clone(), b.clone(), star.clone()],
        vec![b, star.clone(), a],
    ] {
        let guess = guess_top_candidate(&pool).unwrap();
        assert_eq!(guess.candidate.full_name, "Star");
        assert!((guess.confidence - 0.8415).abs() < 1e-3);
    }
}

#[test]
fn three_player_tree_starts_with_leaf() {
    let pool = vec![
        mk("A", "Lakers", "G"),
        mk("B", "Celtics", "F"),
        mk("C", "Celtics", "G"),
    ];
    let tree = DecisionTree::train(
        &pool,
        &EngineConfig {
            max_depth: 3,
            ..EngineConfig::default()
        },
    );
    let node = tree.navigate(Vec::<(String, bool)>::new());
    assert_eq!(
        node,
        &TreeNode::Leaf {
            candidates: pool.clone()
        }
    );
}

fn league() -> Vec<Candidate> {
    let teams = ["Lakers", "Celtics", "Heat", "Suns", "Bulls"];
    let positions = ["G", "F", "C", "G-F", "F-C"];
    (0..60)
        .map(|i| {
            let mut c = mk(&format!("Player {i:02}"), teams[i % 5], positions[(i / 5) % 5]);
            c.id = i.to_string();
            c.age = 19 + (i as u32 * 7) % 18;
            c.height = 180.0 + ((i * 13) % 45) as f64;
            c.weight = 170.0 + ((i * 17) % 90) as f64;
            c.average_points = ((i * 31) % 300) as f64 / 10.0;
            c.awards_count = (i % 7 == 0) as u32 * 2;
            c
        })
        .collect()
}

#[test]
fn honest_answers_keep_the_target_alive() {
    let pool = league();
    let tree = DecisionTree::train(&pool, &EngineConfig::default());
    let session = Session::default();
    let target = pool[17].clone();

    let mut request = SessionRequest::default();
    // Follow the tree's questions until they run out.
    while !tree
        .navigate(request.asked.iter().map(|qa| (qa.question.as_str(), qa.answer)))
        .is_leaf()
    {
        let next = session.next_question(&pool, &request, Some(&tree)).unwrap();
        let answer = next.meta.matches(&target);
        request.asked.push(Answered::new(next.question, answer));
    }

    let narrowed = session.narrow(&pool, &request, Some(&tree)).unwrap();
    assert!(narrowed.iter().any(|c| c.id == target.id));
    assert!(narrowed.len() < pool.len());

    let guess = session.guess(&pool, &request, Some(&tree)).unwrap();
    assert!(narrowed.iter().any(|c| c.id == guess.candidate.id));
    assert!((0.5..=1.0).contains(&guess.confidence));
}

#[test]
fn contradictory_transcript_reports_empty_pool() {
    let pool = league();
    let request = SessionRequest {
        asked: vec![
            Answered::new("Is your player on the Lakers?", true),
            Answered::new("Is your player on the Lakers?", false),
        ],
        candidate_ids: None,
    };
    let err = Session::default().guess(&pool, &request, None).unwrap_err();
    assert_eq!(err, EngineError::EmptyPool);
    assert_eq!(err.to_string(), "No candidates remain after filters");
}

#[test]
fn concurrent_readers_share_one_tree() {
    let pool = league();
    let shared = SharedTree::new(Some(DecisionTree::train(&pool, &EngineConfig::default())));
    let session = Session::default();

    std::thread::scope(|scope| {
        for i in 0..4 {
            let shared = &shared;
            let pool = &pool;
            let session = &session;
            scope.spawn(move || {
                let tree = shared.load().expect("tree installed");
                let request = SessionRequest {
                    asked: Vec::new(),
                    candidate_ids: Some(vec![i.to_string(), (i + 10).to_string()]),
                };
                let next = session
                    .next_question(pool, &request, Some(tree.as_ref()))
                    .expect("pool is not empty");
                assert_eq!(next.remaining, 2);
            });
        }
        scope.spawn(|| {
            let old = shared.replace(Some(DecisionTree::train(
                &pool[..30],
                &EngineConfig::default(),
            )));
            let old: Arc<DecisionTree> = old.expect("previous tree");
            assert!(!old.root().is_leaf());
        });
    });
}
