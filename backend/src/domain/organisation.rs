//! Organisational units: divisions, departments, and positions.
//!
//! Positions form a reports-to graph through their supervisor positions.
//! Edges are only written when a position is created and may only point at
//! positions that already exist, so the graph cannot contain a cycle.

use super::{DepartmentId, DivisionId, PositionId, TenantId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Division {
    pub id: DivisionId,
    pub tenant_id: TenantId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Department {
    pub id: DepartmentId,
    pub tenant_id: TenantId,
    pub division_id: DivisionId,
    pub name: String,
}

/// A position and the positions it reports to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub id: PositionId,
    pub tenant_id: TenantId,
    pub department_id: DepartmentId,
    pub title: String,
    pub supervisor_position_ids: Vec<PositionId>,
}

/// Input for creating a position with its reporting lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPosition {
    pub id: PositionId,
    pub tenant_id: TenantId,
    pub department_id: DepartmentId,
    pub title: String,
    pub supervisor_position_ids: Vec<PositionId>,
}
