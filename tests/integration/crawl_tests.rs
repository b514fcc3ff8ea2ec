//! Crawl cycle tests with stub collaborators

use crate::common::{
    detail_page, front_page, test_config, MemoryPersister, Reply, StubFetcher, SITE_ROOT,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::{timeout, Instant};
use ycrawler::crawler::{parse_front_page, Article, Coordinator};
use ycrawler::storage::DiskPersister;
use ycrawler::CrawlError;

fn item_url(id: &str) -> String {
    format!("{}/item?id={}", SITE_ROOT, id)
}

fn has_article_file(dir: &Path) -> bool {
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .any(|e| e.file_name().to_string_lossy().starts_with("article."))
        })
        .unwrap_or(false)
}

#[tokio::test]
async fn test_two_story_scenario() {
    let temp = TempDir::new().unwrap();
    let front = front_page(&[("1", "A", "http://x"), ("2", "B", "/relative")]);

    assert_eq!(
        parse_front_page(&front),
        vec![
            Article {
                id: "1".to_string(),
                title: "A".to_string(),
                url: "http://x".to_string(),
            },
            Article {
                id: "2".to_string(),
                title: "B".to_string(),
                url: "/relative".to_string(),
            },
        ]
    );

    let fetcher = Arc::new(StubFetcher::new().page(SITE_ROOT, front));
    let coordinator = Coordinator::with_parts(
        test_config(temp.path()),
        fetcher.clone(),
        Arc::new(DiskPersister::new()),
    );

    let report = coordinator.run_cycle().await.expect("cycle failed");

    assert_eq!(report.discovered, 2);
    assert_eq!(report.succeeded, 2);
    assert_eq!(report.failed, 0);

    assert!(temp.path().join("main.html").is_file());
    assert!(has_article_file(&temp.path().join("1")));
    assert!(has_article_file(&temp.path().join("2")));
    assert!(temp.path().join("1").join("detail.html").is_file());

    let calls = fetcher.calls();
    assert!(calls.contains(&"http://x".to_string()));
    assert!(calls.contains(&"/relative".to_string()));
    assert!(calls.contains(&item_url("1")));
    assert!(calls.contains(&item_url("2")));
}

#[tokio::test]
async fn test_second_cycle_fetches_nothing_new() {
    let temp = TempDir::new().unwrap();
    let fetcher = Arc::new(
        StubFetcher::new()
            .page(
                SITE_ROOT,
                front_page(&[("10", "Ten", "/ten"), ("11", "Eleven", "/eleven")]),
            )
            .page(item_url("10"), detail_page(&["https://ten.example/c"])),
    );
    let coordinator = Coordinator::with_parts(
        test_config(temp.path()),
        fetcher.clone(),
        Arc::new(DiskPersister::new()),
    );

    let first = coordinator.run_cycle().await.unwrap();
    assert_eq!(first.launched(), 2);
    let after_first = fetcher.calls().len();
    assert_eq!(after_first, 1 + 2 * 2 + 1);

    let second = coordinator.run_cycle().await.unwrap();
    assert_eq!(second.discovered, 2);
    assert_eq!(second.skipped, 2);
    assert_eq!(second.launched(), 0);

    // Only the front page is fetched again
    assert_eq!(fetcher.calls().len(), after_first + 1);
}

#[tokio::test]
async fn test_partial_directory_is_retried() {
    let temp = TempDir::new().unwrap();
    let leftover = temp.path().join("5");
    std::fs::create_dir(&leftover).unwrap();
    std::fs::write(leftover.join("detail.html"), "old").unwrap();

    let fetcher = Arc::new(StubFetcher::new().page(SITE_ROOT, front_page(&[("5", "Five", "/five")])));
    let coordinator = Coordinator::with_parts(
        test_config(temp.path()),
        fetcher.clone(),
        Arc::new(DiskPersister::new()),
    );

    let report = coordinator.run_cycle().await.unwrap();

    assert_eq!(report.succeeded, 1);
    assert!(fetcher.calls().contains(&"/five".to_string()));
    assert!(has_article_file(&leftover));
}

#[tokio::test(start_paused = true)]
async fn test_comment_files_follow_document_order() {
    let root = Path::new("/out");
    let links = ["https://l1.example", "https://l2.example", "https://l3.example"];

    // The first link answers last
    let fetcher = StubFetcher::new()
        .page(SITE_ROOT, front_page(&[("1", "One", "/one")]))
        .page(item_url("1"), detail_page(&links))
        .reply(links[0], Reply::Delayed(Duration::from_secs(3), "l1".to_string()))
        .reply(links[1], Reply::Delayed(Duration::from_secs(2), "l2".to_string()))
        .reply(links[2], Reply::Delayed(Duration::from_secs(1), "l3".to_string()));

    let persister = Arc::new(MemoryPersister::new());
    let coordinator =
        Coordinator::with_parts(test_config(root), Arc::new(fetcher), persister.clone());

    let report = coordinator.run_cycle().await.unwrap();
    assert_eq!(report.succeeded, 1);

    let dir = root.join("1");
    for (idx, expected) in ["l1", "l2", "l3"].iter().enumerate() {
        let saved = persister
            .get(dir.join(format!("comment_{}.html", idx + 1)))
            .expect("comment file missing");
        assert_eq!(saved.content.text(), *expected);
    }

    assert_eq!(
        persister.names_in(&dir),
        vec![
            "article.html",
            "comment_1.html",
            "comment_2.html",
            "comment_3.html",
            "detail.html",
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_comment_failure_is_isolated_to_its_article() {
    let root = Path::new("/out");

    let fetcher = StubFetcher::new()
        .page(SITE_ROOT, front_page(&[("1", "X", "/x"), ("2", "Y", "/y")]))
        .page(
            item_url("1"),
            detail_page(&["https://ok.example", "https://slow.example", "https://broken.example"]),
        )
        .reply("https://broken.example", Reply::Fail)
        .reply(
            "https://slow.example",
            Reply::Delayed(Duration::from_secs(10), "slow".to_string()),
        )
        .page(item_url("2"), detail_page(&["https://y.example"]))
        .reply(
            "https://y.example",
            Reply::Delayed(Duration::from_secs(3), "y".to_string()),
        );
    let fetcher = Arc::new(fetcher);

    let persister = Arc::new(MemoryPersister::new());
    let coordinator = Coordinator::with_parts(test_config(root), fetcher.clone(), persister.clone());

    let start = Instant::now();
    let report = coordinator.run_cycle().await.unwrap();

    assert_eq!(report.succeeded, 1);
    assert_eq!(report.failed, 1);

    // Y finished normally after X had failed
    assert_eq!(
        persister.names_in(root.join("2")),
        vec!["article.html", "comment_1.html", "detail.html"]
    );

    // X's pending comment fetch was dropped with its group
    assert!(fetcher.calls().contains(&"https://slow.example".to_string()));
    assert!(!persister.contains(root.join("1").join("comment_2.html")));
    assert!(start.elapsed() < Duration::from_secs(10));
}

#[tokio::test(start_paused = true)]
async fn test_article_failure_cancels_comment_branch() {
    let root = Path::new("/out");
    let fetcher = StubFetcher::new()
        .page(SITE_ROOT, front_page(&[("1", "X", "/x")]))
        .reply("/x", Reply::Fail)
        .reply(item_url("1"), Reply::Hang);

    let persister = Arc::new(MemoryPersister::new());
    let coordinator = Coordinator::with_parts(test_config(root), Arc::new(fetcher), persister.clone());

    let report = timeout(Duration::from_secs(5), coordinator.run_cycle())
        .await
        .expect("article group should not wait for the hanging branch")
        .unwrap();

    assert_eq!(report.failed, 1);
    assert!(persister.names_in(root.join("1")).is_empty());
}

#[tokio::test]
async fn test_failed_saves_do_not_stop_the_crawl() {
    let root = Path::new("/out");
    let fetcher = Arc::new(
        StubFetcher::new()
            .page(SITE_ROOT, front_page(&[("1", "One", "/one")]))
            .page(item_url("1"), detail_page(&["https://c.example"])),
    );
    let persister = Arc::new(
        MemoryPersister::new()
            .rejecting("main")
            .rejecting("detail"),
    );
    let coordinator = Coordinator::with_parts(test_config(root), fetcher.clone(), persister.clone());

    let report = coordinator.run_cycle().await.unwrap();

    // Both pages were still parsed from memory
    assert_eq!(report.succeeded, 1);
    assert!(fetcher.calls().contains(&"https://c.example".to_string()));
    assert_eq!(
        persister.names_in(root.join("1")),
        vec!["article.html", "comment_1.html"]
    );
    assert!(!persister.contains(root.join("main.html")));
}

#[tokio::test(start_paused = true)]
async fn test_launches_are_paced() {
    let root = Path::new("/out");
    let mut config = test_config(root);
    config.pacing_delay = Duration::from_secs(1);

    let fetcher = Arc::new(StubFetcher::new().page(
        SITE_ROOT,
        front_page(&[("1", "A", "/a1"), ("2", "B", "/a2"), ("3", "C", "/a3")]),
    ));
    let coordinator =
        Coordinator::with_parts(config, fetcher.clone(), Arc::new(MemoryPersister::new()));

    let start = Instant::now();
    let report = coordinator.run_cycle().await.unwrap();

    assert_eq!(report.succeeded, 3);
    assert_eq!(coordinator.pacer().delays(), 2);
    assert_eq!(start.elapsed(), Duration::from_secs(2));

    let a1 = fetcher.called_at("/a1").unwrap();
    let a2 = fetcher.called_at("/a2").unwrap();
    let a3 = fetcher.called_at("/a3").unwrap();
    assert!(a2 - a1 >= Duration::from_secs(1));
    assert!(a3 - a2 >= Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn test_no_new_articles_no_pacing() {
    let root = Path::new("/out");
    let mut config = test_config(root);
    config.pacing_delay = Duration::from_secs(1);

    let fetcher = Arc::new(StubFetcher::new().page(SITE_ROOT, "<html><body>empty</body></html>"));
    let coordinator = Coordinator::with_parts(config, fetcher, Arc::new(MemoryPersister::new()));

    let report = coordinator.run_cycle().await.unwrap();

    assert_eq!(report.discovered, 0);
    assert_eq!(coordinator.pacer().delays(), 0);
}

#[tokio::test]
async fn test_front_page_failure_fails_cycle() {
    let temp = TempDir::new().unwrap();
    let fetcher = Arc::new(StubFetcher::new().reply(SITE_ROOT, Reply::Fail));
    let coordinator = Coordinator::with_parts(
        test_config(temp.path()),
        fetcher.clone(),
        Arc::new(DiskPersister::new()),
    );

    match coordinator.run_cycle().await {
        Err(CrawlError::FrontPage(inner)) => assert!(inner.is_transport()),
        other => panic!("expected front page error, got {:?}", other),
    }

    assert_eq!(fetcher.calls(), vec![SITE_ROOT.to_string()]);
    assert!(!temp.path().join("main.html").exists());
}
