mod common;

use std::collections::HashSet;

use anyhow::Result;
use reqwest::{header, StatusCode};
use serde_json::{json, Value};

async fn create(client: &reqwest::Client, server: &common::TestServer, body: Value) -> Result<Value> {
    let res = client
        .post(server.url("/articles"))
        .bearer_auth(common::admin_token())
        .json(&body)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED, "create failed: {}", res.status());
    Ok(res.json::<Value>().await?)
}

#[tokio::test]
async fn empty_collection_lists_as_empty_array() -> Result<()> {
    let server = common::spawn_unverified(10).await?;
    let res = reqwest::get(server.url("/articles")).await?;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(res.headers()[header::ACCESS_CONTROL_ALLOW_METHODS], "GET");
    assert_eq!(res.json::<Value>().await?, json!([]));
    Ok(())
}

#[tokio::test]
async fn unknown_article_is_404() -> Result<()> {
    let server = common::spawn_unverified(10).await?;
    let res = reqwest::get(server.url("/articles/no-such-article")).await?;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.text().await?, "Not Found");
    Ok(())
}

#[tokio::test]
async fn article_lifecycle() -> Result<()> {
    let server = common::spawn_unverified(10).await?;
    let client = reqwest::Client::new();

    // Create
    let res = client
        .post(server.url("/articles"))
        .bearer_auth(common::admin_token())
        .json(&json!({ "Title": "First", "Content": "Hello", "Tag": "intro" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let location = res.headers()[header::LOCATION].to_str()?.to_string();
    let created = res.json::<Value>().await?;
    let id = created["id"].as_str().expect("id in response").to_string();
    assert!(!id.is_empty());
    assert_eq!(location, format!("/articles/{id}"));
    assert_eq!(created["title"], "First");
    assert_eq!(created["content"], "Hello");

    // Read back by id and by tag
    let fetched = reqwest::get(server.url(&format!("/articles/{id}"))).await?.json::<Value>().await?;
    assert_eq!(fetched, created);

    let res = reqwest::get(server.url("/articles?tag=intro")).await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?["id"], id.as_str());

    // Update without any token
    let res = client
        .put(server.url(&format!("/articles/{id}")))
        .json(&json!({ "Title": "First (edited)", "Content": "Hello again" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[header::ACCESS_CONTROL_ALLOW_METHODS], "PUT");
    let updated = res.json::<Value>().await?;
    assert_eq!(updated["id"], id.as_str());
    assert_eq!(updated["title"], "First (edited)");
    assert_eq!(updated["content"], "Hello again");

    // Delete returns the prior state
    let res = client
        .delete(server.url(&format!("/articles/{id}")))
        .bearer_auth(common::admin_token())
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[header::ACCESS_CONTROL_ALLOW_METHODS], "DELETE");
    assert_eq!(res.json::<Value>().await?, updated);

    let res = reqwest::get(server.url(&format!("/articles/{id}"))).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn update_never_creates() -> Result<()> {
    let server = common::spawn_unverified(10).await?;
    let client = reqwest::Client::new();

    let res = client
        .put(server.url("/articles/ghost"))
        .json(&json!({ "Title": "Boo", "Content": "Nothing here" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = reqwest::get(server.url("/articles/ghost")).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let all = reqwest::get(server.url("/articles")).await?.json::<Value>().await?;
    assert_eq!(all, json!([]));
    Ok(())
}

#[tokio::test]
async fn update_rejects_bad_bodies() -> Result<()> {
    let server = common::spawn_unverified(10).await?;
    let client = reqwest::Client::new();
    let created = create(&client, &server, json!({ "Title": "t", "Content": "c" })).await?;
    let url = server.url(&format!("/articles/{}", created["id"].as_str().unwrap_or_default()));

    let res = client.put(&url).body("{not json").send().await?;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let res = client.put(&url).json(&json!({ "Title": "", "Content": "c" })).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.text().await?, "Bad Request");

    let res = client.put(server.url("/articles")).json(&json!({ "Title": "t", "Content": "c" })).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn list_spans_page_boundaries() -> Result<()> {
    // Seven articles with three per scan page: two full pages and a partial one.
    let server = common::spawn_unverified(3).await?;
    let client = reqwest::Client::new();

    let mut ids = HashSet::new();
    for i in 0..7 {
        let created = create(&client, &server, json!({ "Title": format!("t{i}"), "Content": "c" })).await?;
        assert!(ids.insert(created["id"].as_str().unwrap_or_default().to_string()));
    }

    let all = reqwest::get(server.url("/articles")).await?.json::<Vec<Value>>().await?;
    assert_eq!(all.len(), 7);
    let listed: HashSet<String> = all
        .iter()
        .filter_map(|a| a["id"].as_str().map(str::to_string))
        .collect();
    assert_eq!(listed, ids);
    Ok(())
}

#[tokio::test]
async fn list_with_exact_multiple_of_page_size() -> Result<()> {
    let server = common::spawn_unverified(2).await?;
    let client = reqwest::Client::new();
    for i in 0..4 {
        create(&client, &server, json!({ "Title": format!("t{i}"), "Content": "c" })).await?;
    }

    let all = reqwest::get(server.url("/articles")).await?.json::<Vec<Value>>().await?;
    assert_eq!(all.len(), 4);
    Ok(())
}

#[tokio::test]
async fn unsupported_method_is_405() -> Result<()> {
    let server = common::spawn_unverified(10).await?;
    let res = reqwest::Client::new()
        .patch(server.url("/articles/abc"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    Ok(())
}

#[tokio::test]
async fn update_without_tag_keeps_tag_lookup() -> Result<()> {
    let server = common::spawn_unverified(10).await?;
    let client = reqwest::Client::new();
    let created = create(&client, &server, json!({ "Title": "t", "Content": "c", "Tag": "news" })).await?;
    let id = created["id"].as_str().unwrap_or_default().to_string();

    let res = client
        .put(server.url(&format!("/articles/{id}")))
        .json(&json!({ "Title": "t2", "Content": "c2" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let updated = res.json::<Value>().await?;
    assert_eq!(updated["title"], "t2");
    assert_eq!(updated["tag"], "news");

    let res = reqwest::get(server.url("/articles?tag=news")).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let found = res.json::<Value>().await?;
    assert_eq!(found["id"], id.as_str());
    assert_eq!(found["content"], "c2");
    Ok(())
}

#[tokio::test]
async fn repeated_tag_parameter_uses_first_value() -> Result<()> {
    let server = common::spawn_unverified(10).await?;
    let client = reqwest::Client::new();
    create(&client, &server, json!({ "Title": "t", "Content": "c", "Tag": "a" })).await?;

    let res = reqwest::get(server.url("/articles?tag=a&tag=b")).await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?["tag"], "a");

    let res = reqwest::get(server.url("/articles?tag=b&tag=a")).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.text().await?, "Not Found");

    let res = client.patch(server.url("/articles?tag=a&tag=b")).send().await?;
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(res.text().await?, "Method Not Allowed");
    Ok(())
}
