//! Handler tests for job application endpoints.

use super::*;
use crate::domain::ports::{MockJobApplicationCommand, MockJobApplicationQuery};
use crate::domain::{
    Actor, ApprovalDecision, DepartmentId, ErrorCode, JobApplicationId, JobRequisition,
    JobRequisitionId, PositionId, TenantId, UserId,
};
use crate::inbound::http::state::test_ports::MockPorts;
use crate::inbound::http::test_utils::{login_request, session_cookie, session_test_app};
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use chrono::{NaiveDate, TimeZone, Utc};
use rstest::{fixture, rstest};
use serde_json::json;

#[fixture]
fn actor() -> Actor {
    Actor::new(UserId::random(), TenantId::random())
}

fn application(tenant_id: TenantId, job_requisition_id: JobRequisitionId) -> JobApplication {
    JobApplication {
        id: JobApplicationId::random(),
        tenant_id,
        job_requisition_id,
        first_name: "Ada".to_owned(),
        last_name: "Lovelace".to_owned(),
        country_code: "GB".to_owned(),
        phone_number: "+447700900123".to_owned(),
        email: "ada@example.com".to_owned(),
        resume_url: "https://cv.example.com/ada.pdf".to_owned(),
        recruiter_decision: None,
        interview_date: None,
        hiring_manager_decision: None,
        offer_start_date: None,
        offer_end_date: None,
        applicant_decision: None,
    }
}

macro_rules! app_with {
    ($ports:expr) => {
        actix_test::init_service(
            session_test_app()
                .app_data(web::Data::new($ports.into_state()))
                .service(create_application)
                .service(record_applicant_decision)
                .service(list_applications)
                .service(record_recruiter_decision)
                .service(schedule_interview)
                .service(record_hiring_manager_decision),
        )
        .await
    };
}

#[rstest]
#[actix_web::test]
async fn public_create_needs_no_session() {
    let tenant = TenantId::random();
    let requisition = JobRequisitionId::random();
    let stored = application(tenant, requisition);
    let returned = stored.clone();
    let mut applications = MockJobApplicationCommand::new();
    applications
        .expect_create()
        .withf(move |request| {
            request.tenant_id == tenant
                && request.job_requisition_id == requisition
                && request.email == "ada@example.com"
        })
        .times(1)
        .return_once(move |_| Ok(returned));
    let app = app_with!(MockPorts {
        applications,
        ..MockPorts::default()
    });

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/tenants/{tenant}/requisitions/{requisition}/applications"))
            .set_json(json!({
                "firstName": "Ada",
                "lastName": "Lovelace",
                "countryCode": "GB",
                "phoneNumber": "+447700900123",
                "email": "ada@example.com",
                "resumeUrl": "https://cv.example.com/ada.pdf",
            }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body: JobApplicationResponse = actix_test::read_body_json(res).await;
    assert_eq!(body.id, stored.id.to_string());
    assert_eq!(body.recruiter_decision, None);
}

#[rstest]
#[actix_web::test]
async fn public_create_reports_the_missing_field() {
    let app = app_with!(MockPorts::default());

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!(
                "/tenants/{}/requisitions/{}/applications",
                TenantId::random(),
                JobRequisitionId::random()
            ))
            .set_json(json!({"firstName": "Ada"}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Error = actix_test::read_body_json(res).await;
    assert_eq!(body.details().and_then(|d| d.get("field")), Some(&json!("lastName")));
}

#[rstest]
#[actix_web::test]
async fn accepting_an_offer_reports_the_onboarding() {
    let tenant = TenantId::random();
    let requisition_id = JobRequisitionId::random();
    let mut accepted = application(tenant, requisition_id);
    accepted.applicant_decision = Some(ApplicantDecision::Accepted);
    let application_id = accepted.id;
    let user_id = UserId::random();
    let position_id = PositionId::random();
    let filled_at = Utc
        .with_ymd_and_hms(2024, 6, 20, 12, 0, 0)
        .single()
        .expect("valid timestamp");
    let onboarding = Onboarding {
        user_id,
        position_id,
        requisition: JobRequisition {
            id: requisition_id,
            tenant_id: tenant,
            title: "Analyst".to_owned(),
            department_id: DepartmentId::random(),
            job_description: "Analyse".to_owned(),
            job_requirements: "SQL".to_owned(),
            requestor: UserId::random(),
            supervisor: UserId::random(),
            supervisor_decision: ApprovalDecision::Approved,
            hr_approver: UserId::random(),
            hr_approver_decision: ApprovalDecision::Approved,
            recruiter: Some(UserId::random()),
            filled_by: Some(user_id),
            filled_at: Some(filled_at),
        },
        application: accepted,
    };

    let mut applications = MockJobApplicationCommand::new();
    applications
        .expect_record_applicant_decision()
        .withf(move |request| {
            request.tenant_id == tenant
                && request.application.application_id == application_id
                && request.email == "ada@example.com"
                && request.decision == ApplicantDecision::Accepted
        })
        .times(1)
        .return_once(move |_| Ok(ApplicantDecisionOutcome::Onboarded(Box::new(onboarding))));
    let app = app_with!(MockPorts {
        applications,
        ..MockPorts::default()
    });

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!(
                "/tenants/{tenant}/requisitions/{requisition_id}/applications/{application_id}/applicant-decision"
            ))
            .set_json(json!({"email": "ada@example.com", "decision": "ACCEPTED"}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: ApplicantDecisionResponse = actix_test::read_body_json(res).await;
    assert_eq!(body.application.applicant_decision, Some(ApplicantDecision::Accepted));
    let summary = body.onboarding.expect("onboarding summary");
    assert_eq!(summary.user_id, user_id.to_string());
    assert_eq!(summary.position_id, position_id.to_string());
    assert_eq!(summary.filled_at, Some(filled_at.to_rfc3339()));
}

#[rstest]
fn declining_has_no_onboarding() {
    let mut declined = application(TenantId::random(), JobRequisitionId::random());
    declined.applicant_decision = Some(ApplicantDecision::Rejected);

    let response = ApplicantDecisionResponse::from(ApplicantDecisionOutcome::Declined(declined));

    assert!(response.onboarding.is_none());
    assert_eq!(response.application.applicant_decision, Some(ApplicantDecision::Rejected));
}

#[rstest]
#[actix_web::test]
async fn interview_date_must_be_iso(actor: Actor) {
    let app = app_with!(MockPorts::default());
    let login = actix_test::call_service(&app, login_request(actor).to_request()).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!(
                "/requisitions/{}/applications/{}/interview",
                JobRequisitionId::random(),
                JobApplicationId::random()
            ))
            .cookie(session_cookie(&login))
            .set_json(json!({"interviewDate": "01/07/2024"}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Error = actix_test::read_body_json(res).await;
    assert_eq!(body.details().and_then(|d| d.get("code")), Some(&json!("invalid_date")));
}

#[rstest]
#[actix_web::test]
async fn hiring_manager_offer_passes_dates(actor: Actor) {
    let requisition = JobRequisitionId::random();
    let application_id = JobApplicationId::random();
    let start = NaiveDate::from_ymd_opt(2024, 7, 1).expect("valid date");
    let end = NaiveDate::from_ymd_opt(2024, 7, 31).expect("valid date");
    let mut applications = MockJobApplicationCommand::new();
    applications
        .expect_record_hiring_manager_decision()
        .withf(move |request| {
            request.application.requisition_id == requisition
                && request.application.application_id == application_id
                && request.decision == HiringManagerDecision::Offered
                && request.offer_start_date == Some(start)
                && request.offer_end_date == Some(end)
        })
        .times(1)
        .return_once(move |request| Ok(application(request.actor.tenant_id, requisition)));
    let app = app_with!(MockPorts {
        applications,
        ..MockPorts::default()
    });
    let login = actix_test::call_service(&app, login_request(actor).to_request()).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!(
                "/requisitions/{requisition}/applications/{application_id}/hiring-manager-decision"
            ))
            .cookie(session_cookie(&login))
            .set_json(json!({
                "decision": "OFFERED",
                "offerStartDate": "2024-07-01",
                "offerEndDate": "2024-07-31",
            }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn recruiter_guard_surfaces_as_forbidden(actor: Actor) {
    let mut applications = MockJobApplicationCommand::new();
    applications
        .expect_record_recruiter_decision()
        .times(1)
        .return_once(|_| Err(Error::missing_supervisor_approval()));
    let app = app_with!(MockPorts {
        applications,
        ..MockPorts::default()
    });
    let login = actix_test::call_service(&app, login_request(actor).to_request()).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!(
                "/requisitions/{}/applications/{}/recruiter-decision",
                JobRequisitionId::random(),
                JobApplicationId::random()
            ))
            .cookie(session_cookie(&login))
            .set_json(json!({"decision": "SHORTLISTED"}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Error = actix_test::read_body_json(res).await;
    assert_eq!(body.code(), ErrorCode::MissingSupervisorApproval);
}

#[rstest]
#[actix_web::test]
async fn list_parses_filters(actor: Actor) {
    let requisition = JobRequisitionId::random();
    let mut applications_query = MockJobApplicationQuery::new();
    applications_query
        .expect_list()
        .withf(move |listed_by, filter| {
            *listed_by == actor
                && filter.tenant_id.is_none()
                && filter.job_requisition_id == Some(requisition)
                && filter.recruiter_decision == Some(RecruiterDecision::Shortlisted)
        })
        .times(1)
        .return_once(|_, _| Ok(Vec::new()));
    let app = app_with!(MockPorts {
        applications_query,
        ..MockPorts::default()
    });
    let login = actix_test::call_service(&app, login_request(actor).to_request()).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!(
                "/applications?jobRequisitionId={requisition}&recruiterDecision=SHORTLISTED"
            ))
            .cookie(session_cookie(&login))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Vec<JobApplicationResponse> = actix_test::read_body_json(res).await;
    assert!(body.is_empty());
}
