//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the embedded migrations exactly. Decision
//! columns are plain text guarded by CHECK constraints; the domain parses
//! them on read.

diesel::table! {
    tenant (id) {
        id -> Uuid,
        name -> Text,
    }
}

diesel::table! {
    division (id) {
        id -> Uuid,
        tenant_id -> Uuid,
        name -> Text,
    }
}

diesel::table! {
    department (id) {
        id -> Uuid,
        tenant_id -> Uuid,
        division_id -> Uuid,
        name -> Text,
    }
}

diesel::table! {
    position (id) {
        id -> Uuid,
        tenant_id -> Uuid,
        title -> Text,
        department_id -> Uuid,
    }
}

diesel::table! {
    /// Reports-to edges between positions.
    subordinate_supervisor_relationship (tenant_id, subordinate_position_id, supervisor_position_id) {
        tenant_id -> Uuid,
        subordinate_position_id -> Uuid,
        supervisor_position_id -> Uuid,
    }
}

diesel::table! {
    user_account (id) {
        id -> Uuid,
        tenant_id -> Uuid,
        email -> Text,
        password -> Text,
        totp_secret_key -> Text,
        last_login -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    position_assignment (tenant_id, position_id, user_account_id, start_date) {
        tenant_id -> Uuid,
        position_id -> Uuid,
        user_account_id -> Uuid,
        start_date -> Date,
        end_date -> Nullable<Date>,
    }
}

diesel::table! {
    job_requisition (id) {
        id -> Uuid,
        tenant_id -> Uuid,
        title -> Text,
        department_id -> Uuid,
        job_description -> Text,
        job_requirements -> Text,
        requestor -> Uuid,
        supervisor -> Uuid,
        supervisor_decision -> Text,
        hr_approver -> Uuid,
        hr_approver_decision -> Text,
        recruiter -> Nullable<Uuid>,
        filled_by -> Nullable<Uuid>,
        filled_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    job_application (id) {
        id -> Uuid,
        tenant_id -> Uuid,
        job_requisition_id -> Uuid,
        first_name -> Text,
        last_name -> Text,
        country_code -> Text,
        phone_number -> Text,
        email -> Text,
        resume_url -> Text,
        recruiter_decision -> Nullable<Text>,
        interview_date -> Nullable<Date>,
        hiring_manager_decision -> Nullable<Text>,
        offer_start_date -> Nullable<Date>,
        offer_end_date -> Nullable<Date>,
        applicant_decision -> Nullable<Text>,
    }
}

diesel::table! {
    /// Authorization policy rows; see the migration for column meanings.
    casbin_rule (id) {
        id -> Int4,
        ptype -> Text,
        v0 -> Text,
        v1 -> Text,
        v2 -> Text,
        v3 -> Text,
    }
}
