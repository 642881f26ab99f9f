mod common;

use dizipal_core::{emit, DizipalScraper, PlaylistLimits, Strategy};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{episode_blocks, mount_page, test_config};

const FRAME_SCRIPT: &str = r#"<html><script>
    var player = new Playerjs({id:"player", file:"https://cdn.example/hls/roma/master.m3u8"});
</script></html>"#;

fn scraper(server: &MockServer) -> DizipalScraper {
    DizipalScraper::with_domain(test_config(server), &server.uri()).unwrap()
}

#[tokio::test]
async fn test_resolve_stream_through_primary_frame() {
    let server = MockServer::start().await;
    let scraper = scraper(&server);
    let referer = scraper.base_url().as_str().to_string();

    mount_page(
        &server,
        "/film/roma",
        r#"<div class="series-player-container"><iframe src="/player/roma"></iframe></div>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/player/roma"))
        .and(header("referer", referer.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string(FRAME_SCRIPT))
        .expect(1)
        .mount(&server)
        .await;

    let stream = scraper.resolve_stream(&format!("{}/film/roma", server.uri())).await;
    assert_eq!(stream.as_deref(), Some("https://cdn.example/hls/roma/master.m3u8"));
}

#[tokio::test]
async fn test_resolve_stream_through_fallback_frame() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/film/roma",
        format!(r#"<div id="vast_new"><iframe src="{}/embed/7"></iframe></div>"#, server.uri()),
    )
    .await;
    mount_page(
        &server,
        "/embed/7",
        r#"<video><source src="https:\/\/cdn.example\/hls\/7\/index.m3u8"></video>"#,
    )
    .await;

    let stream = scraper(&server)
        .resolve_stream(&format!("{}/film/roma", server.uri()))
        .await;
    assert_eq!(stream.as_deref(), Some("https://cdn.example/hls/7/index.m3u8"));
}

#[tokio::test]
async fn test_resolve_stream_without_frame() {
    let server = MockServer::start().await;
    mount_page(&server, "/film/roma", "<html><body>Yakında</body></html>").await;

    let stream = scraper(&server)
        .resolve_stream(&format!("{}/film/roma", server.uri()))
        .await;
    assert_eq!(stream, None);
}

#[tokio::test]
async fn test_resolve_stream_failed_frame() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/film/roma",
        r#"<div class="series-player-container"><iframe src="/player/roma"></iframe></div>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/player/roma"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let stream = scraper(&server)
        .resolve_stream(&format!("{}/film/roma", server.uri()))
        .await;
    assert_eq!(stream, None);
}

#[tokio::test]
async fn test_streams_strategy_end_to_end() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/sitemap.xml",
        format!(
            r#"<urlset><url><loc>{base}/dizi/leyla</loc></url><url><loc>{base}/film/roma</loc></url></urlset>"#
        ),
    )
    .await;
    mount_page(&server, "/dizi/leyla", episode_blocks("Leyla", &["/dizi/leyla/sezon-1/bolum-1"])).await;
    mount_page(
        &server,
        "/dizi/leyla/sezon-1/bolum-1",
        r#"<div class="series-player-container"><iframe src="/player/leyla-1"></iframe></div>"#,
    )
    .await;
    mount_page(&server, "/player/leyla-1", r#"file: "https://cdn.example/hls/leyla-1.m3u8""#).await;
    // the film page has no player, so it is skipped
    mount_page(&server, "/film/roma", "<html></html>").await;

    let catalog = scraper(&server).build_catalog(Strategy::Streams).await.unwrap();
    let output = emit(&catalog, &PlaylistLimits::default());
    assert_eq!(
        output,
        "#EXTM3U\n\n# CATEGORY: DİZİLER\n#EXTINF:-1, Leyla S01E01\nhttps://cdn.example/hls/leyla-1.m3u8\n"
    );
}

#[tokio::test]
async fn test_streams_strategy_skips_repeated_stream() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/sitemap.xml",
        format!("<urlset><url><loc>{base}/dizi/leyla</loc></url></urlset>"),
    )
    .await;
    mount_page(
        &server,
        "/dizi/leyla",
        episode_blocks("Leyla", &["/dizi/leyla/sezon-1/bolum-1", "/dizi/leyla/sezon-1/bolum-2"]),
    )
    .await;
    for episode in ["bolum-1", "bolum-2"] {
        mount_page(
            &server,
            &format!("/dizi/leyla/sezon-1/{episode}"),
            r#"<div class="series-player-container"><iframe src="/player/same"></iframe></div>"#,
        )
        .await;
    }
    mount_page(&server, "/player/same", r#"file:"https://cdn.example/same.m3u8""#).await;

    let catalog = scraper(&server).build_catalog(Strategy::Streams).await.unwrap();
    let output = emit(&catalog, &PlaylistLimits::default());
    assert_eq!(output.matches("https://cdn.example/same.m3u8").count(), 1);
    assert_eq!(catalog.len(), 1);
}
