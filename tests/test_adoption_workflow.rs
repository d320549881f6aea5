//! End-to-end adoption workflow against an in-memory database:
//! register pets and adopters, adopt, report, delete.

use chrono::Local;
use pet_shelter::{
    Action, FormInput, NewAdopter, NewPet, Outcome, PetStatus, ShelterError, ShelterService,
    SqlValue,
};

async fn fresh_service() -> ShelterService {
    let (service, report) = ShelterService::connect("sqlite::memory:", true)
        .await
        .expect("in-memory database");
    assert!(report.is_clean(), "schema setup failed: {:?}", report.failures);
    service
}

fn rex() -> NewPet {
    NewPet {
        name: "Rex".into(),
        breed: "Lab".into(),
        age: 3,
        gender: "M".into(),
    }
}

fn jo() -> NewAdopter {
    NewAdopter {
        name: "Jo".into(),
        phone: "555".into(),
        city: "NYC".into(),
    }
}

async fn adoption_rows_for(service: &ShelterService, pet_id: i64) -> usize {
    service
        .list_adoptions()
        .await
        .unwrap()
        .into_iter()
        .filter(|a| a.pet_id == pet_id)
        .count()
}

#[tokio::test]
async fn new_pets_start_available() {
    let service = fresh_service().await;
    let id = service.add_pet(&rex()).await.unwrap();

    let pets = service.list_pets().await.unwrap();
    assert_eq!(pets.len(), 1);
    assert_eq!(pets[0].pet_id, id);
    assert_eq!(pets[0].name, "Rex");
    assert_eq!(pets[0].breed, "Lab");
    assert_eq!(pets[0].age, 3);
    assert_eq!(pets[0].gender, "M");
    assert_eq!(pets[0].status, PetStatus::Available);
}

#[tokio::test]
async fn adoption_flips_status_and_shows_in_report() {
    let service = fresh_service().await;
    let pet_id = service.add_pet(&rex()).await.unwrap();
    let adopter_id = service.add_adopter(&jo()).await.unwrap();

    let adoption = service.adopt_pet(pet_id, adopter_id).await.unwrap();
    let today = Local::now().date_naive();
    assert_eq!(adoption.pet_id, pet_id);
    assert_eq!(adoption.adopter_id, adopter_id);
    assert_eq!(adoption.adoption_date, today);

    let pet = service.find_pet(pet_id).await.unwrap().unwrap();
    assert_eq!(pet.status, PetStatus::Adopted);

    let report = service.adopted_report().await.unwrap();
    assert_eq!(report.len(), 1);
    let row = &report[0];
    assert_eq!(
        (row.pet_name.as_str(), row.breed.as_str(), row.adopter_name.as_str(), row.city.as_str()),
        ("Rex", "Lab", "Jo", "NYC")
    );
    assert_eq!(row.adoption_date, today);
}

#[tokio::test]
async fn second_adoption_is_refused() {
    let service = fresh_service().await;
    let pet_id = service.add_pet(&rex()).await.unwrap();
    let jo_id = service.add_adopter(&jo()).await.unwrap();
    let sam_id = service
        .add_adopter(&NewAdopter {
            name: "Sam".into(),
            phone: "556".into(),
            city: "LA".into(),
        })
        .await
        .unwrap();

    service.adopt_pet(pet_id, jo_id).await.unwrap();
    let err = service.adopt_pet(pet_id, sam_id).await.unwrap_err();
    assert!(matches!(err, ShelterError::AlreadyAdopted(id) if id == pet_id));
    assert!(err.to_string().contains("already adopted"));

    assert_eq!(adoption_rows_for(&service, pet_id).await, 1);
    assert_eq!(service.adopted_report().await.unwrap().len(), 1);
    // Still adopted: nothing reverts the status.
    let pet = service.find_pet(pet_id).await.unwrap().unwrap();
    assert_eq!(pet.status, PetStatus::Adopted);
}

#[tokio::test]
async fn adopting_unknown_pet_fails_without_rows() {
    let service = fresh_service().await;
    let adopter_id = service.add_adopter(&jo()).await.unwrap();

    let err = service.adopt_pet(999, adopter_id).await.unwrap_err();
    assert!(matches!(err, ShelterError::PetNotFound(999)));
    assert!(err.to_string().contains("not found"));
    assert!(service.list_adoptions().await.unwrap().is_empty());
}

#[tokio::test]
async fn adopting_with_unknown_adopter_leaves_pet_available() {
    let service = fresh_service().await;
    let pet_id = service.add_pet(&rex()).await.unwrap();

    let err = service.adopt_pet(pet_id, 42).await.unwrap_err();
    assert!(matches!(err, ShelterError::AdopterNotFound(42)));

    let pet = service.find_pet(pet_id).await.unwrap().unwrap();
    assert_eq!(pet.status, PetStatus::Available);
    assert!(service.list_adoptions().await.unwrap().is_empty());
}

#[tokio::test]
async fn unique_constraint_rejects_direct_second_adoption_row() {
    let service = fresh_service().await;
    let pet_id = service.add_pet(&rex()).await.unwrap();
    let adopter_id = service.add_adopter(&jo()).await.unwrap();
    service.adopt_pet(pet_id, adopter_id).await.unwrap();

    let err = service
        .executor()
        .mutate(
            "INSERT INTO Adoption (Pet_ID, Adopter_ID, Adoption_Date) VALUES (?, ?, '2024-01-01')",
            &[pet_id.into(), adopter_id.into()],
        )
        .await
        .unwrap_err();
    assert!(err.is_unique_violation());
    assert_eq!(adoption_rows_for(&service, pet_id).await, 1);
}

#[tokio::test]
async fn deleting_a_pet_removes_its_adoptions() {
    let service = fresh_service().await;
    let pet_id = service.add_pet(&rex()).await.unwrap();
    let adopter_id = service.add_adopter(&jo()).await.unwrap();
    service.adopt_pet(pet_id, adopter_id).await.unwrap();

    service.delete_pet(pet_id).await.unwrap();

    assert!(service.find_pet(pet_id).await.unwrap().is_none());
    assert_eq!(adoption_rows_for(&service, pet_id).await, 0);
    assert!(service
        .adopted_report()
        .await
        .unwrap()
        .iter()
        .all(|r| r.pet_name != "Rex"));
    // The adopter stays.
    assert_eq!(service.list_adopters().await.unwrap().len(), 1);

    let err = service.delete_pet(pet_id).await.unwrap_err();
    assert!(matches!(err, ShelterError::PetNotFound(_)));
}

#[tokio::test]
async fn failed_pet_delete_keeps_its_adoptions() {
    let service = fresh_service().await;
    let pet = service.add_pet(&rex()).await.unwrap();
    let adopter = service.add_adopter(&jo()).await.unwrap();
    service.adopt_pet(pet, adopter).await.unwrap();

    // Make the second delete in the transaction fail after the first succeeded.
    service
        .executor()
        .execute_ddl(
            "CREATE TRIGGER pets_locked BEFORE DELETE ON Pets \
             BEGIN SELECT RAISE(ABORT, 'pets are locked'); END",
        )
        .await
        .unwrap();

    let err = service.delete_pet(pet).await.unwrap_err();
    assert!(matches!(err, ShelterError::Statement(_)), "got {:?}", err);

    assert_eq!(adoption_rows_for(&service, pet).await, 1);
    assert!(service.find_pet(pet).await.unwrap().is_some());
}

#[tokio::test]
async fn failed_status_flip_discards_the_adoption_row() {
    let service = fresh_service().await;
    let pet = service.add_pet(&rex()).await.unwrap();
    let adopter = service.add_adopter(&jo()).await.unwrap();

    service
        .executor()
        .execute_ddl(
            "CREATE TRIGGER status_frozen BEFORE UPDATE OF Status ON Pets \
             BEGIN SELECT RAISE(ABORT, 'status is frozen'); END",
        )
        .await
        .unwrap();

    let err = service.adopt_pet(pet, adopter).await.unwrap_err();
    assert!(matches!(err, ShelterError::Statement(_)), "got {:?}", err);

    assert_eq!(adoption_rows_for(&service, pet).await, 0);
    let stored = service.find_pet(pet).await.unwrap().unwrap();
    assert_eq!(stored.status, PetStatus::Available);
}

#[tokio::test]
async fn available_count_tracks_status() {
    let service = fresh_service().await;
    assert_eq!(service.available_count().await.unwrap(), 0);

    let a = service.add_pet(&rex()).await.unwrap();
    let b = service
        .add_pet(&NewPet {
            name: "Mia".into(),
            breed: "Siamese".into(),
            age: 2,
            gender: "F".into(),
        })
        .await
        .unwrap();
    assert_eq!(service.available_count().await.unwrap(), 2);

    let adopter_id = service.add_adopter(&jo()).await.unwrap();
    service.adopt_pet(a, adopter_id).await.unwrap();
    assert_eq!(service.available_count().await.unwrap(), 1);

    service.delete_pet(b).await.unwrap();
    assert_eq!(service.available_count().await.unwrap(), 0);

    let available = service
        .list_pets()
        .await
        .unwrap()
        .iter()
        .filter(|p| p.is_available())
        .count() as i64;
    assert_eq!(service.available_count().await.unwrap(), available);
}

#[tokio::test]
async fn rename_and_search() {
    let service = fresh_service().await;
    let id = service.add_pet(&rex()).await.unwrap();
    service
        .add_pet(&NewPet {
            name: "Max".into(),
            breed: "Beagle".into(),
            age: 5,
            gender: "M".into(),
        })
        .await
        .unwrap();

    service.update_pet_name(id, "Rexy").await.unwrap();
    let hits = service.search_pets("rex").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Rexy");

    assert!(service.search_pets("zzz").await.unwrap().is_empty());
    assert!(matches!(
        service.search_pets("").await,
        Err(ShelterError::Validation(_))
    ));
    assert!(matches!(
        service.update_pet_name(77, "Ghost").await,
        Err(ShelterError::PetNotFound(77))
    ));
}

#[tokio::test]
async fn handle_maps_results_to_notices_and_tables() {
    let service = fresh_service().await;

    let add = FormInput::new()
        .with("name", "Rex")
        .with("breed", "Lab")
        .with("age", "3")
        .with("gender", "M");
    let outcome = service.handle(Action::AddPet, &add).await;
    assert_eq!(outcome.notice().unwrap().message, "Pet added successfully!");

    let bad_age = add.clone().with("age", "three");
    let outcome = service.handle(Action::AddPet, &bad_age).await;
    assert!(outcome.is_error());
    assert_eq!(outcome.notice().unwrap().title, "Input Error");

    let outcome = service.handle(Action::ViewPets, &FormInput::new()).await;
    let table = outcome.table().unwrap();
    assert_eq!(table.columns, ["Pet_ID", "Pet_Name", "Breed", "Age", "Gender", "Status"]);
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0][5], SqlValue::Text("Available".into()));

    let adopter = FormInput::new()
        .with("name", "Jo")
        .with("phone", "555")
        .with("city", "NYC");
    service.handle(Action::AddAdopter, &adopter).await;

    let adopt = FormInput::new().with("pet_id", "1").with("adopter_id", "1");
    let outcome = service.handle(Action::AdoptPet, &adopt).await;
    assert!(!outcome.is_error(), "{:?}", outcome);

    let outcome = service.handle(Action::AdoptPet, &adopt).await;
    let notice = outcome.notice().unwrap();
    assert_eq!(notice.title, "Adoption Failed");
    assert_eq!(notice.message, "Pet ID 1 is already adopted.");

    let outcome = service.handle(Action::AdoptedReport, &FormInput::new()).await;
    let report = outcome.table().unwrap();
    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.rows[0][2], SqlValue::Text("Jo".into()));

    let outcome = service.handle(Action::AvailableCount, &FormInput::new()).await;
    assert_eq!(outcome.notice().unwrap().message, "Total Available Pets: 0");

    let missing = FormInput::new().with("pet_id", "9").with("new_name", "X");
    let outcome = service.handle(Action::UpdatePetName, &missing).await;
    assert_eq!(outcome.notice().unwrap().title, "Update Failed");

    let search = FormInput::new().with("name", "nobody");
    let outcome = service.handle(Action::SearchPets, &search).await;
    assert_eq!(
        outcome.notice().unwrap().message,
        "No pets found with names matching 'nobody'."
    );

    let outcome = service.handle(Action::Exit, &FormInput::new()).await;
    assert_eq!(outcome, Outcome::Closed);
    assert!(!service.is_connected());
}

#[tokio::test]
async fn closed_session_reports_connection_errors() {
    let service = fresh_service().await;
    service.close().await;

    assert!(matches!(
        service.list_pets().await,
        Err(ShelterError::ConnectionUnavailable)
    ));
    assert!(matches!(
        service.adopt_pet(1, 1).await,
        Err(ShelterError::ConnectionUnavailable)
    ));
    let outcome = service.handle(Action::ViewAdopters, &FormInput::new()).await;
    assert_eq!(outcome.notice().unwrap().title, "Connection Error");
}
