use std::sync::Arc;

use client::{ApiClient, ClientError, FormDialog};
use models::{clinica, restaurante, RecordId};
use service::{InMemoryRepository, Repository};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

async fn start_server() -> ApiClient {
    let app = server::routes::build_router(
        |d| Arc::new(InMemoryRepository::new(d)) as Arc<dyn Repository>,
        CorsLayer::very_permissive(),
    );
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });
    ApiClient::new(format!("http://{}", addr))
}

#[tokio::test]
async fn saved_form_creates_a_record() {
    let api = start_server().await;

    let mut dialog = FormDialog::open_for(&clinica::PACIENTE, None);
    dialog.input("nombre", "Ana").unwrap();
    dialog.input("direccion", "Calle 1").unwrap();
    dialog.input("telefono", "5551234").unwrap();
    dialog.input("fecha_nacimiento", "15/03/2024").unwrap();
    dialog.input("historial_medico", "Ninguno").unwrap();
    let form = dialog.save().unwrap();

    assert_eq!(api.create(&clinica::PACIENTE, &form).await.unwrap(), "Paciente creado");

    let page = api.list(&clinica::PACIENTE, 1, 10, Some("ana")).await.unwrap();
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0]["fecha_nacimiento"], "2024-03-15");
    assert_eq!(page.pagination.total_records, 1);
}

#[tokio::test]
async fn edit_form_round_trips_through_update() {
    let api = start_server().await;
    let mut dialog = FormDialog::open_for(&restaurante::CLIENTE, None);
    dialog.input("nombre", "Ana").unwrap();
    dialog.input("correo_electronico", "ana@example.com").unwrap();
    dialog.input("telefono", "1").unwrap();
    api.create(&restaurante::CLIENTE, &dialog.save().unwrap()).await.unwrap();

    let row = api.list(&restaurante::CLIENTE, 1, 10, None).await.unwrap().data.remove(0);
    let mut edit = FormDialog::open_for(&restaurante::CLIENTE, Some(&row));
    assert_eq!(edit.email_indicator("correo_electronico"), Some(true));
    edit.input("telefono", "2").unwrap();
    let msg = api.update(&restaurante::CLIENTE, &RecordId::Serial(1), &edit.save().unwrap()).await.unwrap();
    assert_eq!(msg, "Cliente actualizado");

    let row = &api.list(&restaurante::CLIENTE, 1, 10, None).await.unwrap().data[0];
    assert_eq!(row["telefono"], "2");
}

#[tokio::test]
async fn server_errors_surface_as_api_errors() {
    let api = start_server().await;
    let err = api.delete(&clinica::PACIENTE, &RecordId::Serial(5)).await.unwrap_err();
    assert!(err.is_not_found());
    match err {
        ClientError::Api { message, .. } => assert_eq!(message, "Recurso no encontrado"),
        other => panic!("unexpected error: {other}"),
    }
}
