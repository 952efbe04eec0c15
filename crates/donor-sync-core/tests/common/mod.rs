//! In-memory donor backend shared by the integration tests.

#![allow(dead_code)]

use std::cell::RefCell;

use donor_sync_core::api::{ApiError, ApiResponse, ApiResult, DonorApi};
use donor_sync_core::models::{
    AvailabilitySlot, BloodType, DonorRecord, HealthCondition, HealthConditionLink,
    ReadyStatusPayload, RegisterDonorPayload, UpdateDonorPayload,
};
use donor_sync_core::{DonorProfileSync, SessionContext, SyncConfig};

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    BloodTypes,
    HealthConditions,
    MyDonor,
    DonorById(i64),
    Register(RegisterDonorPayload),
    Update(i64, UpdateDonorPayload),
    Ready(i64, ReadyStatusPayload),
}

impl Call {
    pub fn is_write(&self) -> bool {
        matches!(self, Call::Register(_) | Call::Update(..) | Call::Ready(..))
    }
}

pub struct FakeApi {
    pub blood_types: RefCell<ApiResult<ApiResponse<Vec<BloodType>>>>,
    pub health_conditions: RefCell<ApiResult<ApiResponse<Vec<HealthCondition>>>>,
    pub my_donor: RefCell<ApiResult<Option<ApiResponse<DonorRecord>>>>,
    pub donor_by_id: RefCell<ApiResult<ApiResponse<DonorRecord>>>,
    pub register: RefCell<ApiResult<ApiResponse<DonorRecord>>>,
    pub update: RefCell<ApiResult<ApiResponse<DonorRecord>>>,
    pub ready: RefCell<ApiResult<ApiResponse<DonorRecord>>>,
    pub calls: RefCell<Vec<Call>>,
}

impl FakeApi {
    /// Reference data served, no donor registered yet.
    pub fn unregistered() -> Self {
        Self {
            blood_types: RefCell::new(Ok(ApiResponse::ok(blood_types()))),
            health_conditions: RefCell::new(Ok(ApiResponse::ok(health_conditions()))),
            my_donor: RefCell::new(Ok(None)),
            donor_by_id: RefCell::new(Err(ApiError::NotFound)),
            register: RefCell::new(Err(ApiError::Transport("unexpected".into()))),
            update: RefCell::new(Err(ApiError::Transport("unexpected".into()))),
            ready: RefCell::new(Err(ApiError::Transport("unexpected".into()))),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Reference data served and `record` returned by get-my-donor.
    pub fn registered(record: DonorRecord) -> Self {
        let api = Self::unregistered();
        *api.my_donor.borrow_mut() = Ok(Some(ApiResponse::ok(record)));
        api
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, matcher: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| matcher(c)).count()
    }

    pub fn writes(&self) -> Vec<Call> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.is_write())
            .cloned()
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

impl DonorApi for FakeApi {
    async fn get_blood_types(&self) -> ApiResult<ApiResponse<Vec<BloodType>>> {
        self.record(Call::BloodTypes);
        self.blood_types.borrow().clone()
    }

    async fn get_health_conditions(&self) -> ApiResult<ApiResponse<Vec<HealthCondition>>> {
        self.record(Call::HealthConditions);
        self.health_conditions.borrow().clone()
    }

    async fn get_my_donor(&self) -> ApiResult<Option<ApiResponse<DonorRecord>>> {
        self.record(Call::MyDonor);
        self.my_donor.borrow().clone()
    }

    async fn get_donor_by_id(&self, donor_id: i64) -> ApiResult<ApiResponse<DonorRecord>> {
        self.record(Call::DonorById(donor_id));
        self.donor_by_id.borrow().clone()
    }

    async fn register_donor(
        &self,
        payload: &RegisterDonorPayload,
    ) -> ApiResult<ApiResponse<DonorRecord>> {
        self.record(Call::Register(payload.clone()));
        self.register.borrow().clone()
    }

    async fn update_my_donor(
        &self,
        donor_id: i64,
        payload: &UpdateDonorPayload,
    ) -> ApiResult<ApiResponse<DonorRecord>> {
        self.record(Call::Update(donor_id, payload.clone()));
        self.update.borrow().clone()
    }

    async fn update_ready_status(
        &self,
        donor_id: i64,
        payload: &ReadyStatusPayload,
    ) -> ApiResult<ApiResponse<DonorRecord>> {
        self.record(Call::Ready(donor_id, *payload));
        self.ready.borrow().clone()
    }
}

pub fn blood_types() -> Vec<BloodType> {
    vec![
        BloodType::new(8, "O-", "O negative"),
        BloodType::new(1, "A+", "A positive"),
        BloodType::new(5, "AB+", "AB positive"),
        BloodType::new(2, "A-", "A negative"),
    ]
}

pub fn health_conditions() -> Vec<HealthCondition> {
    let mut hepatitis = HealthCondition::new(7, "Hepatitis B");
    hepatitis.is_donation_eligible = Some(false);
    vec![
        HealthCondition::new(1, "Hypertension"),
        HealthCondition::new(3, "Diabetes"),
        HealthCondition::new(5, "Asthma"),
        hepatitis,
    ]
}

/// A complete donor record as the embedded read returns it.
pub fn donor_record(donor_id: i64) -> DonorRecord {
    let mut record = DonorRecord::new(donor_id, 2);
    record.address_id = Some(11);
    record.full_address = Some("12 Harbour Rd".into());
    record.travel_radius_km = Some(25.0);
    record.availabilities = vec![
        AvailabilitySlot::new(1, 540, 1020),
        AvailabilitySlot::new(3, 600, 720),
    ];
    record.health_conditions = vec![HealthConditionLink {
        condition_id: Some(3),
        id: Some(900),
        name: Some("Diabetes".into()),
    }];
    record
}

pub fn new_sync(api: FakeApi) -> DonorProfileSync<FakeApi> {
    DonorProfileSync::new(api, SessionContext::new(5), SyncConfig::default())
}
