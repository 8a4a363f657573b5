use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use axum::{Json, Router, extract::State, http::HeaderMap, routing::get};
use serde_json::{Value, json};
use tchmusic::feed::{Feed, MusicInfoFeed};

#[derive(Clone)]
struct FakeFeedServer {
    body: Value,
    user_agents: Arc<Mutex<Vec<String>>>,
}

async fn music_info(State(server): State<FakeFeedServer>, headers: HeaderMap) -> Json<Value> {
    if let Some(agent) = headers.get("user-agent") {
        server
            .user_agents
            .lock()
            .unwrap()
            .push(agent.to_str().unwrap().to_string());
    }
    Json(server.body)
}

async fn start_fake_feed(server: FakeFeedServer) -> SocketAddr {
    let app = Router::new()
        .route("/api/get_music_info", get(music_info))
        .with_state(server);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn create_server(current_name: &str) -> FakeFeedServer {
    FakeFeedServer {
        body: json!({
            "previous": {"name": "Yesterday", "artist": "The Beatles"},
            "current": {"name": current_name, "artist": "Adele", "type": "song"},
            "next": {"name": "", "artist": ""},
            "schedulerTime": "2019-12-14T00:40:29+07:00",
            "expire": 30
        }),
        user_agents: Arc::new(Mutex::new(Vec::new())),
    }
}

#[tokio::test]
async fn test_feed_sends_fixed_user_agent() {
    let server = create_server("Hello");
    let addr = start_fake_feed(server.clone()).await;
    let feed = MusicInfoFeed::new(format!("http://{}/api/get_music_info", addr)).unwrap();

    let song = feed.current().await.unwrap().unwrap();

    assert_eq!(song.name, "Hello");
    assert_eq!(song.artist, "Adele");
    assert_eq!(
        *server.user_agents.lock().unwrap(),
        vec!["github.com:nguyenvanduocit/tchmusic+v1"]
    );
}

#[tokio::test]
async fn test_feed_without_current_name_has_no_song() {
    let addr = start_fake_feed(create_server("")).await;
    let feed = MusicInfoFeed::new(format!("http://{}/api/get_music_info", addr)).unwrap();

    assert!(feed.current().await.unwrap().is_none());
}
