//! Resource operations end to end against a mock Apollo server.

mod common;

use apollo_arrow::resources::AddOrganism;
use apollo_arrow::{Error, Output, TransportError};
use common::{archive, password_client, PASSWORD, USERNAME};
use mockito::Matcher;
use serde_json::{json, Value};

fn json_reply(server: &mut mockito::Server, path: &str, body: Value) -> mockito::Mock {
    server
        .mock("POST", path)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create()
}

#[test]
fn test_add_organism_returns_only_the_new_organism() {
    let dir = tempfile::tempdir().unwrap();
    let path = archive(&dir, "fly.tar.gz", "genome");

    let mut server = mockito::Server::new();
    let mock = json_reply(
        &mut server,
        "/organism/addOrganismWithSequence",
        json!([
            {"commonName": "Yeast", "genus": "Saccharomyces", "id": "7"},
            {"commonName": "Fly1", "genus": "Drosophila", "id": "42"},
        ]),
    );

    let client = password_client(&server);
    let opts = AddOrganism {
        genus: Some("Drosophila".into()),
        ..AddOrganism::default()
    };
    let out = client.organisms().add_organism("Fly1", &path, &opts).unwrap();
    assert_eq!(
        out,
        Output::List(vec![json!({"commonName": "Fly1", "genus": "Drosophila", "id": "42"})])
    );
    mock.assert();
}

#[test]
fn test_add_organism_without_match_is_empty_list() {
    let dir = tempfile::tempdir().unwrap();
    let path = archive(&dir, "fly.zip", "genome");

    let mut server = mockito::Server::new();
    let _mock = json_reply(
        &mut server,
        "/organism/addOrganismWithSequence",
        json!([{"commonName": "Yeast", "id": "7"}]),
    );

    let client = password_client(&server);
    let out = client
        .organisms()
        .add_organism("Fly1", &path, &AddOrganism::default())
        .unwrap();
    assert_eq!(out, Output::List(vec![]));
}

#[test]
fn test_add_organism_sends_optional_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = archive(&dir, "fly.tar.gz", "genome");

    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/organism/addOrganismWithSequence")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("name=\"publicMode\"\r\n\r\ntrue\r\n".into()),
            Matcher::Regex("name=\"nonDefaultTranslationTable\"\r\n\r\n11\r\n".into()),
            Matcher::Regex("name=\"metadata\"\r\n\r\n\\{\"source\":\"flybase\"\\}\r\n".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create();

    let client = password_client(&server);
    let opts = AddOrganism {
        public: true,
        non_default_translation_table: Some(11),
        metadata: Some(json!({"source": "flybase"})),
        ..AddOrganism::default()
    };
    client.organisms().add_organism("Fly1", &path, &opts).unwrap();
    mock.assert();
}

#[test]
fn test_missing_archive_fails_before_sending() {
    let dir = tempfile::tempdir().unwrap();
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/organism/addOrganismWithSequence")
        .expect(0)
        .create();

    let client = password_client(&server);
    let err = client
        .organisms()
        .add_organism("Fly1", &dir.path().join("absent.tar.gz"), &AddOrganism::default())
        .unwrap_err();
    assert!(matches!(err, Error::Io(_)));
    mock.assert();
}

#[test]
fn test_upload_transport_failure_is_never_remote_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = archive(&dir, "fly.tar.gz", "genome");

    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/organism/addOrganismWithSequence")
        .with_status(500)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error": "disk full"}"#)
        .create();

    let client = password_client(&server);
    let err = client
        .organisms()
        .add_organism("Fly1", &path, &AddOrganism::default())
        .unwrap_err();
    assert!(err.is_transport());
    assert!(!err.is_remote());
}

#[test]
fn test_delete_organism_returns_confirmation() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/organism/deleteOrganismWithSequence")
        .match_body(Matcher::PartialJson(json!({"organism": "42"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": 42, "commonName": "Fly1", "username": "admin@local.host"}"#)
        .create();

    let client = password_client(&server);
    let out = client.organisms().delete_organism("42").unwrap();
    assert_eq!(out.into_value(), json!({"id": 42, "commonName": "Fly1"}));
    mock.assert();
}

#[test]
fn test_deletes_of_unknown_ids_are_remote_errors() {
    let mut server = mockito::Server::new();
    let _mock = json_reply(
        &mut server,
        "/organism/deleteOrganismWithSequence",
        json!({"error": "Organism 999 not found"}),
    );
    let _mock = json_reply(
        &mut server,
        "/organism/deleteTrackFromOrganism",
        json!({"error": "Track nope not found"}),
    );
    let _mock = json_reply(
        &mut server,
        "/availableStatus/deleteStatus",
        json!({"error": "Status 999 not found"}),
    );

    let client = password_client(&server);
    let results = [
        client.organisms().delete_organism("999"),
        client.organisms().delete_track("42", "nope"),
        client.statuses().delete_status("999"),
    ];
    for result in results {
        match result {
            Err(Error::Remote(e)) => assert!(e.message.contains("not found"), "{e}"),
            other => panic!("expected remote error, got {other:?}"),
        }
    }
}

#[test]
fn test_track_update_replaces_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = archive(&dir, "track.tar.gz", "track data");
    let config = json!({
        "key": "Genes",
        "label": "genes",
        "storeClass": "JBrowse/Store/SeqFeature/NCList",
        "type": "FeatureTrack",
        "urlTemplate": "tracks/genes/{refseq}/trackData.json",
    });
    let updated = json!({
        "key": "Curated genes",
        "label": "genes",
        "storeClass": "JBrowse/Store/SeqFeature/NCList",
        "type": "FeatureTrack",
        "urlTemplate": "tracks/genes/{refseq}/trackData.json",
    });

    let mut server = mockito::Server::new();
    let add = server
        .mock("POST", "/organism/addTrackToOrganism")
        .match_body(Matcher::Regex("name=\"trackData\"; filename=\"track.tar.gz\"".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"tracks": [config]}).to_string())
        .create();
    let update = server
        .mock("POST", "/organism/updateTrackForOrganism")
        .match_body(Matcher::PartialJson(json!({
            "organism": "42",
            "trackConfig": updated.to_string(),
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"tracks": [updated]}).to_string())
        .create();

    let client = password_client(&server);
    let organisms = client.organisms();
    organisms.add_track("42", &path, &config).unwrap();
    let out = organisms.update_track("42", &updated).unwrap().into_value();

    let track = out["tracks"]
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["label"] == "genes")
        .unwrap();
    assert_eq!(track, &updated);
    assert_ne!(track, &config);
    add.assert();
    update.assert();
}

#[test]
fn test_set_sequence_context_used_by_later_queries() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/annotationEditor/getSequenceAlterations")
        .match_body(Matcher::PartialJson(json!({
            "organism": "Fly1",
            "sequence": "chr2L",
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"type": "deletion", "location": {"fmin": 10, "fmax": 12}}]"#)
        .expect(2)
        .create();

    let client = password_client(&server);
    let mut annotations = client.annotations();
    annotations.set_sequence("Fly1", "chr2L");
    let first = annotations.get_sequence_alterations(None, None).unwrap();
    let second = annotations.get_sequence_alterations(None, None).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.into_list().len(), 1);
    mock.assert();
}

#[test]
fn test_get_gff3_asks_for_feature() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/annotationEditor/getGff3")
        .match_body(Matcher::PartialJson(json!({
            "features": [{"uniquename": "abc-123"}],
            "organism": "Fly1",
            "sequence": "chr2L",
        })))
        .with_status(200)
        .with_header("content-type", "text/plain")
        .with_body("##gff-version 3\n")
        .create();

    let client = password_client(&server);
    let mut annotations = client.annotations();
    let out = annotations
        .get_gff3("abc-123", Some("Fly1"), Some("chr2L"))
        .unwrap();
    assert_eq!(out, Output::Lines(vec!["##gff-version 3".into()]));
    mock.assert();
}

#[test]
fn test_status_crud_sends_numeric_ids() {
    let mut server = mockito::Server::new();
    let create = server
        .mock("POST", "/availableStatus/createStatus")
        .match_body(Matcher::PartialJson(json!({"value": "Needs review"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": 5, "value": "Needs review"}"#)
        .create();
    let update = server
        .mock("POST", "/availableStatus/updateStatus")
        .match_body(Matcher::PartialJson(json!({"id": 5, "new_value": "Reviewed"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": 5, "value": "Reviewed"}"#)
        .create();

    let client = password_client(&server);
    let statuses = client.statuses();
    let created = statuses.add_status("Needs review").unwrap().into_value();
    assert_eq!(created["id"], 5);
    let updated = statuses.update_status("5", "Reviewed").unwrap().into_value();
    assert_eq!(updated["value"], "Reviewed");
    create.assert();
    update.assert();
}

#[test]
fn test_show_status_filters_by_value() {
    let mut server = mockito::Server::new();
    let _mock = json_reply(
        &mut server,
        "/availableStatus/showStatus",
        json!([{"id": 1, "value": "Finished"}, {"id": 2, "value": "Draft"}]),
    );

    let client = password_client(&server);
    let statuses = client.statuses();
    assert_eq!(
        statuses.show_status("Draft").unwrap().into_value(),
        json!({"id": 2, "value": "Draft"})
    );
    assert!(statuses.show_status("Missing").unwrap_err().is_remote());
}

#[test]
fn test_canned_values() {
    let mut server = mockito::Server::new();
    let _mock = json_reply(
        &mut server,
        "/cannedValue/showValue",
        json!([{"id": 1, "label": "partial"}, {"id": 2, "label": "pseudo"}]),
    );
    let delete = server
        .mock("POST", "/cannedValue/deleteValue")
        .match_body(Matcher::PartialJson(json!({"id": 2})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": 2, "label": "pseudo"}"#)
        .create();

    let client = password_client(&server);
    let values = client.canned_values();
    assert_eq!(values.find_all_values().unwrap().into_list().len(), 2);
    assert_eq!(
        values.show_value("pseudo").unwrap().into_value(),
        json!({"id": 2, "label": "pseudo"})
    );
    values.delete_value("2").unwrap();
    delete.assert();
}

#[test]
fn test_load_user_by_id() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/user/loadUsers")
        .match_body(Matcher::PartialJson(json!({"userId": 3})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"userId": 3, "username": "curator@local.host", "role": "USER"}]"#)
        .create();
    let _mock = server
        .mock("POST", "/user/loadUsers")
        .match_body(Matcher::PartialJson(json!({"userId": 4})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create();

    let client = password_client(&server);
    let user = client.users().load_user_by_id("3").unwrap().into_value();
    assert_eq!(user["username"], "curator@local.host");
    assert!(client.users().load_user_by_id("4").unwrap_err().is_remote());
}

#[test]
fn test_html_reply_where_json_expected() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/user/loadUsers")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body("<html>login</html>")
        .create();

    let client = password_client(&server);
    let err = client.users().get_users().unwrap_err();
    assert!(matches!(
        err,
        Error::Transport(TransportError::MalformedBody(_))
    ));
}

#[test]
fn test_get_organisms_with_and_without_name() {
    let mut server = mockito::Server::new();
    let all = server
        .mock("POST", "/organism/findAllOrganisms")
        .match_body(Matcher::Json(json!({
            "username": USERNAME,
            "password": PASSWORD,
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"commonName": "Fly1", "id": 42}, {"commonName": "Yeast", "id": 7}]"#)
        .create();
    let one = server
        .mock("POST", "/organism/findAllOrganisms")
        .match_body(Matcher::PartialJson(json!({"organism": "Yeast"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"commonName": "Yeast", "id": 7}"#)
        .create();

    let client = password_client(&server);
    let organisms = client.organisms();
    assert_eq!(organisms.get_organisms(None).unwrap().into_list().len(), 2);
    assert_eq!(
        organisms.get_organisms(Some("Yeast")).unwrap(),
        Output::List(vec![json!({"commonName": "Yeast", "id": 7})])
    );
    all.assert();
    one.assert();
}

#[test]
fn test_get_features_is_a_dict_scoped_to_the_sequence() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/annotationEditor/getFeatures")
        .match_body(Matcher::PartialJson(json!({
            "organism": "Fly1",
            "sequence": "chr2L",
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "features": [{"uniquename": "abc-123", "name": "gene1"}],
                "username": USERNAME,
            })
            .to_string(),
        )
        .create();

    let client = password_client(&server);
    let mut annotations = client.annotations();
    let out = annotations.get_features(Some("Fly1"), Some("chr2L")).unwrap();
    assert_eq!(
        out.into_value(),
        json!({"features": [{"uniquename": "abc-123", "name": "gene1"}]})
    );
    mock.assert();
}

#[test]
fn test_canned_value_create_and_update_fields() {
    let mut server = mockito::Server::new();
    let create = server
        .mock("POST", "/cannedValue/createValue")
        .match_body(Matcher::Json(json!({
            "value": "partial",
            "metadata": r#"{"note":"5' end missing"}"#,
            "username": USERNAME,
            "password": PASSWORD,
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": 8, "label": "partial"}"#)
        .create();
    let update = server
        .mock("POST", "/cannedValue/updateValue")
        .match_body(Matcher::Json(json!({
            "id": 8,
            "new_value": "partial gene",
            "username": USERNAME,
            "password": PASSWORD,
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": 8, "label": "partial gene"}"#)
        .create();

    let client = password_client(&server);
    let values = client.canned_values();
    let metadata = json!({"note": "5' end missing"});
    let created = values.add_value("partial", Some(&metadata)).unwrap();
    assert_eq!(created.into_value()["id"], 8);
    let updated = values.update_value("8", "partial gene", None).unwrap();
    assert_eq!(updated.into_value()["label"], "partial gene");
    create.assert();
    update.assert();
}

#[test]
fn test_get_users_sends_no_filter() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/user/loadUsers")
        .match_body(Matcher::Json(json!({
            "username": USERNAME,
            "password": PASSWORD,
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"userId": 1}, {"userId": 3}]"#)
        .create();

    let client = password_client(&server);
    let users = client.users().get_users().unwrap();
    assert_eq!(users.into_list().len(), 2);
    mock.assert();
}

#[test]
fn test_update_status_sends_new_value() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/availableStatus/updateStatus")
        .match_body(Matcher::Json(json!({
            "id": 5,
            "new_value": "Reviewed",
            "username": USERNAME,
            "password": PASSWORD,
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": 5, "value": "Reviewed", "password": "secret"}"#)
        .create();

    let client = password_client(&server);
    let out = client.statuses().update_status("5", "Reviewed").unwrap();
    assert_eq!(out.into_value(), json!({"id": 5, "value": "Reviewed"}));
    mock.assert();
}
