//! End-to-end session behavior against a scripted backend

mod common;

use common::{numbered, scored, ScriptedBackend};
use search_console::config::SearchConfig;
use search_console::error::AppError;
use search_console::features::FeatureRegistry;
use search_console::models::{Feature, ResultType};
use search_console::query::Location;
use search_console::session::{FetchRequest, ResultsView, SearchSession, PROMPT_MESSAGE};
use search_console::spellcheck::AdvisorState;

fn search_config() -> SearchConfig {
    SearchConfig {
        page_size: 10,
        default_result_type: ResultType::Doc,
        debug_allowed: true,
    }
}

/// Type `term` and press Enter
fn type_and_submit(session: &mut SearchSession, term: &str) -> Vec<FetchRequest> {
    let mut requests = session.set_draft(term);
    requests.extend(session.submit());
    requests
}

#[tokio::test]
async fn test_unset_location_shows_prompt() {
    let backend = ScriptedBackend::new();
    let (session, requests) = SearchSession::open(&search_config(), Location::unset(ResultType::Doc));

    assert!(requests.is_empty());
    assert_eq!(session.view().results, ResultsView::Prompt);
    assert!(session.view().to_string().contains(PROMPT_MESSAGE));
    assert!(backend.calls().await.is_empty());
}

#[tokio::test]
async fn test_bookmarked_location_fetches_on_open() {
    let backend = ScriptedBackend::new().with_results("rust", numbered(3));
    let location = Location::parse("/search/pdf?q=rust", ResultType::Doc).unwrap();

    let (mut session, requests) = SearchSession::open(&search_config(), location);
    session.settle(&backend, requests).await;

    assert_eq!(session.query().term.as_deref(), Some("rust"));
    assert_eq!(session.draft(), "rust");
    assert!(backend.calls().await.contains(&"search:pdf:rust".to_string()));
    match session.view().results {
        ResultsView::Results { items, total, .. } => {
            assert_eq!(total, 3);
            assert_eq!(items.len(), 3);
        }
        other => panic!("unexpected view {:?}", other),
    }
}

#[tokio::test]
async fn test_explicit_empty_term_shows_no_results() {
    let backend = ScriptedBackend::new();
    let mut session = SearchSession::new(&search_config());

    let location = Location::parse("/search/doc?q=", ResultType::Doc).unwrap();
    let requests = session.navigate(location);
    assert_eq!(requests.len(), 2);
    session.settle(&backend, requests).await;

    assert_eq!(session.view().results, ResultsView::NoResults { term: "" });
    assert_eq!(session.location().to_string(), "/search/doc?q=");
    assert!(session.view().to_string().contains("We cannot find anything matching"));
}

#[tokio::test]
async fn test_editing_after_submit_keeps_canonical_and_hides_suggestion() {
    let backend = ScriptedBackend::new()
        .with_results("cta", numbered(2))
        .with_suggestion("cta", "cat")
        .with_suggestion("ctaerpillar", "caterpillar");
    let mut session = SearchSession::new(&search_config());

    let requests = type_and_submit(&mut session, "cta");
    session.settle(&backend, requests).await;
    assert_eq!(session.spellcheck_state(), AdvisorState::Ready);
    assert_eq!(session.view().suggestion.unwrap().suggested, "cat");
    assert!(session.view().to_string().contains("Do you mean cat?"));

    let requests = session.set_draft("ctaerpillar");
    assert!(session.view().suggestion.is_none());
    session.settle(&backend, requests).await;

    assert_eq!(session.query().term.as_deref(), Some("cta"));
    assert_eq!(session.draft(), "ctaerpillar");
    assert_eq!(session.spellcheck_state(), AdvisorState::Suppressed);
    assert!(session.view().suggestion.is_none());
    // typing never searches
    let searches = backend
        .calls()
        .await
        .into_iter()
        .filter(|c| c.starts_with("search:"))
        .count();
    assert_eq!(searches, 1);
}

#[tokio::test]
async fn test_stale_search_response_is_dropped() {
    let backend = ScriptedBackend::new()
        .with_results("slow", numbered(7))
        .with_results("fast", numbered(2));
    let mut session = SearchSession::new(&search_config());

    let slow = type_and_submit(&mut session, "slow");
    let fast = type_and_submit(&mut session, "fast");

    // the newer search completes first
    for request in fast {
        session.apply(request.run(&backend).await).unwrap();
    }
    for request in slow {
        let err = session.apply(request.run(&backend).await).unwrap_err();
        assert!(matches!(err, AppError::StaleResponse { .. }));
        assert!(!err.is_user_visible());
    }

    assert_eq!(session.query().term.as_deref(), Some("fast"));
    match session.view().results {
        ResultsView::Results { total, .. } => assert_eq!(total, 2),
        other => panic!("unexpected view {:?}", other),
    }
}

#[tokio::test]
async fn test_search_failure_is_shown_and_session_recovers() {
    let broken = ScriptedBackend::new().failing_search();
    let healthy = ScriptedBackend::new().with_results("rust", numbered(1));
    let mut session = SearchSession::new(&search_config());

    let requests = type_and_submit(&mut session, "rust");
    session.settle(&broken, requests).await;
    match session.view().results {
        ResultsView::Failed { term, message } => {
            assert_eq!(term, "rust");
            assert!(message.contains("500"));
        }
        other => panic!("unexpected view {:?}", other),
    }

    let requests = session.submit();
    session.settle(&healthy, requests).await;
    assert!(matches!(session.view().results, ResultsView::Results { total: 1, .. }));
}

#[tokio::test]
async fn test_spellcheck_failure_is_silent() {
    let backend = ScriptedBackend::new()
        .with_results("cta", numbered(4))
        .failing_spellcheck();
    let mut session = SearchSession::new(&search_config());

    let requests = type_and_submit(&mut session, "cta");
    session.settle(&backend, requests).await;

    assert_eq!(session.spellcheck_state(), AdvisorState::Suppressed);
    let view = session.view();
    assert!(view.suggestion.is_none());
    assert!(matches!(view.results, ResultsView::Results { total: 4, .. }));
    assert!(!view.to_string().contains("Do you mean"));
}

#[tokio::test]
async fn test_accept_suggestion_searches_corrected_term() {
    let backend = ScriptedBackend::new()
        .with_results("cat", numbered(5))
        .with_suggestion("cta", "cat");
    let mut session = SearchSession::new(&search_config());

    let requests = type_and_submit(&mut session, "cta");
    session.settle(&backend, requests).await;

    let requests = session.accept_suggestion();
    assert!(requests
        .iter()
        .any(|r| matches!(r, FetchRequest::Search(t) if t.term == "cat")));
    session.settle(&backend, requests).await;

    assert_eq!(session.query().term.as_deref(), Some("cat"));
    assert_eq!(session.location().to_string(), "/search/doc?q=cat");
    assert!(session.view().suggestion.is_none());
    assert!(matches!(session.view().results, ResultsView::Results { total: 5, .. }));
}

#[tokio::test]
async fn test_accept_without_suggestion_is_noop() {
    let mut session = SearchSession::new(&search_config());
    assert!(session.accept_suggestion().is_empty());
}

#[tokio::test]
async fn test_back_and_forward_restore_terms() {
    let backend = ScriptedBackend::new()
        .with_results("first", numbered(1))
        .with_results("second", numbered(2));
    let mut session = SearchSession::new(&search_config());

    let requests = type_and_submit(&mut session, "first");
    session.settle(&backend, requests).await;
    let requests = type_and_submit(&mut session, "second");
    session.settle(&backend, requests).await;

    let requests = session.back();
    assert!(matches!(requests.first(), Some(FetchRequest::Search(t)) if t.term == "first"));
    session.settle(&backend, requests).await;
    assert_eq!(session.query().term.as_deref(), Some("first"));
    assert_eq!(session.draft(), "first");
    assert!(matches!(session.view().results, ResultsView::Results { total: 1, .. }));

    // back to the unset start location
    assert!(session.back().is_empty());
    assert_eq!(session.query().term, None);
    assert_eq!(session.view().results, ResultsView::Prompt);
    assert!(session.back().is_empty());

    session.forward();
    let requests = session.forward();
    session.settle(&backend, requests).await;
    assert_eq!(session.query().term.as_deref(), Some("second"));
    assert!(session.forward().is_empty());
}

#[tokio::test]
async fn test_paging_is_local() {
    let backend = ScriptedBackend::new().with_results("many", numbered(25));
    let mut session = SearchSession::new(&search_config());

    let requests = type_and_submit(&mut session, "many");
    session.settle(&backend, requests).await;
    let calls_before = backend.calls().await.len();

    session.set_page(3);
    match session.view().results {
        ResultsView::Results {
            items,
            page,
            page_count,
            show_pagination,
            ..
        } => {
            assert_eq!(page, 3);
            assert_eq!(page_count, 3);
            assert!(show_pagination);
            let urls: Vec<&str> = items.iter().map(|i| i.result.url.as_str()).collect();
            assert_eq!(urls, ["r20", "r21", "r22", "r23", "r24"]);
        }
        other => panic!("unexpected view {:?}", other),
    }

    session.set_page(9);
    assert!(matches!(
        session.view().results,
        ResultsView::Results { ref items, .. } if items.is_empty()
    ));

    session.set_page(0);
    assert_eq!(session.query().page, 1);
    assert_eq!(backend.calls().await.len(), calls_before);
}

#[tokio::test]
async fn test_new_search_resets_page() {
    let backend = ScriptedBackend::new().with_results("many", numbered(25));
    let mut session = SearchSession::new(&search_config());

    let requests = type_and_submit(&mut session, "many");
    session.settle(&backend, requests).await;
    session.set_page(2);

    let requests = session.submit();
    session.settle(&backend, requests).await;
    assert_eq!(session.query().page, 1);
}

#[tokio::test]
async fn test_single_page_hides_pagination() {
    let backend = ScriptedBackend::new().with_results("few", numbered(10));
    let mut session = SearchSession::new(&search_config());

    let requests = type_and_submit(&mut session, "few");
    session.settle(&backend, requests).await;
    assert!(matches!(
        session.view().results,
        ResultsView::Results { show_pagination: false, page_count: 1, .. }
    ));
}

#[tokio::test]
async fn test_debug_mode_explains_results() {
    let backend = ScriptedBackend::new().with_results(
        "rust",
        vec![scored("https://rust-lang.org", 7.25, &[("tfidf", 3.0), ("pagerank", 10.0)])],
    );
    let mut session = SearchSession::new(&search_config());
    session.replace_registry(FeatureRegistry::from_features([
        Feature::new("tfidf", 2.0, false),
        Feature::new("pagerank", 0.5, true),
    ]));

    let requests = type_and_submit(&mut session, "rust");
    session.settle(&backend, requests).await;
    assert!(session.view().formula.is_none());

    assert!(session.toggle_debug());
    let view = session.view();
    assert!(view.debug_mode);
    assert_eq!(
        view.formula.as_deref(),
        Some("Final Score = tfidf * 2 + log(pagerank) * 0.5")
    );
    match &view.results {
        ResultsView::Results { items, .. } => {
            let explanation = items[0].explanation.as_ref().unwrap();
            assert_eq!(explanation.total_score, 7.25);
            assert_eq!(explanation.contributions.len(), 2);
        }
        other => panic!("unexpected view {:?}", other),
    }
    assert!(view.to_string().contains("Total Score: 7.25"));

    // toggling debug does not refetch
    let searches = backend
        .calls()
        .await
        .into_iter()
        .filter(|c| c.starts_with("search:"))
        .count();
    assert_eq!(searches, 1);
}

#[tokio::test]
async fn test_debug_unavailable_when_not_allowed() {
    let mut session = SearchSession::new(&SearchConfig {
        debug_allowed: false,
        ..search_config()
    });
    assert!(!session.toggle_debug());
    assert!(session.view().formula.is_none());
}

#[tokio::test]
async fn test_unset_location_hides_previous_suggestion() {
    let backend = ScriptedBackend::new()
        .with_results("cta", numbered(2))
        .with_suggestion("cta", "cat");
    let mut session = SearchSession::new(&search_config());

    let requests = type_and_submit(&mut session, "cta");
    session.settle(&backend, requests).await;
    assert!(session.view().suggestion.is_some());

    assert!(session.navigate(Location::unset(ResultType::Doc)).is_empty());
    let view = session.view();
    assert_eq!(view.results, ResultsView::Prompt);
    assert!(view.suggestion.is_none());
    assert!(!view.to_string().contains("Do you mean"));
    assert!(session.accept_suggestion().is_empty());

    // back to the misspelled term shows the suggestion again without refetching it
    let requests = session.back();
    assert!(requests.iter().all(|r| matches!(r, FetchRequest::Search(_))));
    session.settle(&backend, requests).await;
    assert_eq!(session.view().suggestion.unwrap().suggested, "cat");
}

#[tokio::test]
async fn test_failed_warm_spellcheck_is_not_retried_on_submit() {
    let backend = ScriptedBackend::new()
        .with_results("cta", numbered(1))
        .failing_spellcheck();
    let mut session = SearchSession::new(&search_config());

    let requests = session.set_draft("cta");
    session.settle(&backend, requests).await;

    let requests = session.submit();
    assert!(requests.iter().all(|r| matches!(r, FetchRequest::Search(_))));
    session.settle(&backend, requests).await;

    let spellchecks = backend
        .calls()
        .await
        .into_iter()
        .filter(|c| c.starts_with("spellcheck:"))
        .count();
    assert_eq!(spellchecks, 1);
    assert_eq!(session.spellcheck_state(), AdvisorState::Suppressed);
    assert!(session.view().suggestion.is_none());
}

#[tokio::test]
async fn test_settle_drops_superseded_responses() {
    let backend = ScriptedBackend::new()
        .with_results("slow", numbered(7))
        .with_results("fast", numbered(2));
    let mut session = SearchSession::new(&search_config());

    let mut requests = type_and_submit(&mut session, "slow");
    requests.extend(type_and_submit(&mut session, "fast"));
    session.settle(&backend, requests).await;

    assert_eq!(session.query().term.as_deref(), Some("fast"));
    assert!(matches!(session.view().results, ResultsView::Results { total: 2, .. }));
}
