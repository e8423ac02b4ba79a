//! End-to-end sweep tests with scripted browser sessions

use citesweep_domain::{ProviderKind, ProviderResponse, UnresolvedReason};
use citesweep_domain::traits::RedirectResolver;
use citesweep_extractor::{ExtractorConfig, InferenceExtractor, ResponseExtractor};
use citesweep_llm::{MockProvider, MockSearchProvider};
use citesweep_pipeline::{
    flatten_catalog, CitationNormalizer, NoopObserver, PromptCatalog, SweepConfig, SweepPlan,
    SweepRunner,
};
use citesweep_resolver::mock::{NavigationScript, ScriptedLauncher};
use citesweep_resolver::{BrowserRedirectResolver, ResolverConfig, GROUNDING_REDIRECT_PREFIX};
use serde_json::json;
use tokio_util::sync::CancellationToken;

fn catalog() -> PromptCatalog {
    toml::from_str(
        r#"
        [[conflict_a.diplomacy]]
        prompt = "Summarize the latest ceasefire talks."
        category = "neutral"
        "#,
    )
    .unwrap()
}

fn gemini_response(uris: &[&str]) -> ProviderResponse {
    let chunks: Vec<_> = uris.iter().map(|uri| json!({"web": {"uri": uri, "title": "t"}})).collect();
    ProviderResponse::json(
        ProviderKind::Gemini,
        json!({"candidates": [{
            "content": {"parts": [{"text": "Talks resumed on Monday."}]},
            "groundingMetadata": {"groundingChunks": chunks}
        }]}),
    )
}

fn single_cell_config() -> SweepConfig {
    SweepConfig {
        temperatures: vec![0.7],
        iterations: 1,
        top_n: None,
    }
}

#[tokio::test(start_paused = true)]
async fn test_plain_and_timed_out_indirection_urls() {
    let proxy = format!("{}AUZIYQtimeout", GROUNDING_REDIRECT_PREFIX);
    let plain = "https://www.bbc.co.uk/news/world";

    let launcher = ScriptedLauncher::new().with_script(proxy.as_str(), NavigationScript::new().hangs());
    let resolver = BrowserRedirectResolver::new(launcher, ResolverConfig::default()).unwrap();
    let provider = MockSearchProvider::new(gemini_response(&[plain, proxy.as_str()]));
    let runner = SweepRunner::new(
        vec![provider],
        ResponseExtractor::new(InferenceExtractor::new(
            MockProvider::default(),
            ExtractorConfig::default(),
        )),
        CitationNormalizer::new(resolver),
    );

    let prompts = flatten_catalog(&catalog(), None);
    let plan = SweepPlan::new(&runner.provider_kinds(), &prompts, &single_cell_config());
    let report = runner.run(&plan, &mut NoopObserver, &CancellationToken::new()).await;

    assert_eq!(report.records.len(), 1);
    let record = &report.records[0];
    assert!(record.succeeded);
    assert!(record.tool_calling);
    assert_eq!(record.conflict, "conflict_a");
    assert_eq!(record.subcategory, "diplomacy");
    assert_eq!(record.raw_response.as_deref(), Some("Talks resumed on Monday."));

    assert_eq!(record.citations.len(), 2);
    assert_eq!(record.citations[0].source_url_or_name, plain);
    assert!(record.citations[0].resolved);
    assert_eq!(record.citations[1].source_url_or_name, proxy);
    assert!(!record.citations[1].resolved);

    let resolver = runner.normalizer().resolver();
    assert_eq!(resolver.launcher().launch_count(), 1);
    assert_eq!(resolver.launcher().close_count(), 1);
    assert_eq!(
        resolver.resolve(&proxy).await.reason(),
        Some(UnresolvedReason::Timeout)
    );
    assert_eq!(resolver.stats().cache_hits, 1);
    assert_eq!(report.metrics.unresolved, 1);
}

#[tokio::test]
async fn test_redirects_resolved_and_collapsed_across_iterations() {
    let first = format!("{}AAA", GROUNDING_REDIRECT_PREFIX);
    let second = format!("{}BBB", GROUNDING_REDIRECT_PREFIX);
    let destination = "https://www.reuters.com/world/talks";

    let launcher = ScriptedLauncher::new()
        .with_script(first.as_str(), NavigationScript::redirect(&first, 302, destination))
        .with_script(second.as_str(), NavigationScript::redirect(&second, 302, destination));
    let resolver = BrowserRedirectResolver::new(launcher, ResolverConfig::default()).unwrap();
    let provider = MockSearchProvider::new(gemini_response(&[first.as_str(), second.as_str()]));
    let runner = SweepRunner::new(
        vec![provider],
        ResponseExtractor::new(InferenceExtractor::new(
            MockProvider::default(),
            ExtractorConfig::default(),
        )),
        CitationNormalizer::new(resolver),
    );

    let config = SweepConfig {
        iterations: 3,
        ..single_cell_config()
    };
    let plan = SweepPlan::new(&runner.provider_kinds(), &flatten_catalog(&catalog(), None), &config);
    let report = runner.run(&plan, &mut NoopObserver, &CancellationToken::new()).await;

    assert_eq!(report.records.len(), 3);
    for (i, record) in report.records.iter().enumerate() {
        assert_eq!(record.iteration, i as u32 + 1);
        assert_eq!(record.citations.len(), 1);
        assert_eq!(record.citations[0].source_url_or_name, destination);
        assert!(record.citations[0].resolved);
    }

    // Each indirection URL launched a browser once; later iterations hit the cache
    let resolver = runner.normalizer().resolver();
    assert_eq!(resolver.launcher().launch_count(), 2);
    assert_eq!(resolver.stats().cache_hits, 4);
    assert_eq!(report.metrics.average_citations(), 1.0);
}

#[tokio::test]
async fn test_failed_provider_does_not_stop_sweep() {
    let resolver =
        BrowserRedirectResolver::new(ScriptedLauncher::new(), ResolverConfig::default()).unwrap();
    let mut failing = MockSearchProvider::new(ProviderResponse::text(ProviderKind::Claude, ""));
    failing.add_error("Summarize the latest ceasefire talks.");
    let working = MockSearchProvider::new(ProviderResponse::text(
        ProviderKind::Ollama,
        "Al Jazeera and Reuters both reported the talks.",
    ));

    let runner = SweepRunner::new(
        vec![failing, working],
        ResponseExtractor::new(InferenceExtractor::new(
            MockProvider::new(r#"{"citations": ["Al Jazeera", "Reuters", "sources say"]}"#),
            ExtractorConfig::default(),
        )),
        CitationNormalizer::new(resolver),
    );

    let plan = SweepPlan::new(
        &runner.provider_kinds(),
        &flatten_catalog(&catalog(), None),
        &single_cell_config(),
    );
    let report = runner.run(&plan, &mut NoopObserver, &CancellationToken::new()).await;

    assert_eq!(report.records.len(), 2);
    assert!(!report.records[0].succeeded);
    assert_eq!(report.records[0].provider, ProviderKind::Claude);

    let ollama = &report.records[1];
    assert!(ollama.succeeded);
    assert!(!ollama.tool_calling);
    let names: Vec<_> = ollama.citations.iter().map(|c| c.source_url_or_name.as_str()).collect();
    assert_eq!(names, vec!["Al Jazeera", "Reuters"]);
    assert_eq!(runner.normalizer().resolver().launcher().launch_count(), 0);
}
