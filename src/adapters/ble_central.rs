//! BLE central adapter for the heart-rate strap.
//!
//! Implements [`TransportPort`]: scan for the Heart Rate service, connect,
//! resolve the measurement characteristic, and arm notifications.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: Bluedroid GAP + GATT client via raw
//!   `esp_idf_svc::sys` calls.
//! - **all other targets**: simulation stub for host-side runs.
//!
//! ## Callback bridge
//!
//! Bluedroid callbacks are C function pointers that cannot capture Rust
//! closures.  Handshake progress crosses over in atomics; measurement
//! notifications and disconnects go straight into
//! [`LINK_MAILBOX`](crate::mailbox::LINK_MAILBOX), which the control loop
//! drains once per tick.
//!
//! The port methods are blocking: each handshake step waits for its
//! completion event (bounded by a timeout) before returning.

use log::info;
#[cfg(target_os = "espidf")]
use log::{error, warn};

use crate::app::ports::{PeerAddress, TransportPort};
use crate::config::ControllerConfig;
use crate::error::LinkError;

// ───────────────────────────────────────────────────────────────
// Constants
// ───────────────────────────────────────────────────────────────

/// Client Characteristic Configuration descriptor.
pub const CCCD_UUID: u16 = 0x2902;
/// CCCD value enabling notifications.
pub const CCCD_ENABLE_NOTIFY: [u8; 2] = [0x01, 0x00];

/// Upper bound for any single handshake step.
pub const STEP_TIMEOUT_MS: u32 = 4_000;

// AD structure types carrying 16-bit service UUIDs.
const AD_INCOMPLETE_UUID16: u8 = 0x02;
const AD_COMPLETE_UUID16: u8 = 0x03;

// ───────────────────────────────────────────────────────────────
// Advertisement parsing (pure, host-testable)
// ───────────────────────────────────────────────────────────────

/// Whether raw advertising data lists `uuid16` among its 16-bit services.
///
/// Malformed or truncated AD structures end the walk without a match.
pub fn advertises_service(adv: &[u8], uuid16: u16) -> bool {
    let mut rest = adv;
    while let [len, tail @ ..] = rest {
        let len = *len as usize;
        if len == 0 || len > tail.len() {
            return false;
        }
        let (field, next) = tail.split_at(len);
        let (ad_type, data) = (field[0], &field[1..]);
        if ad_type == AD_INCOMPLETE_UUID16 || ad_type == AD_COMPLETE_UUID16 {
            let found = data
                .chunks_exact(2)
                .any(|c| u16::from_le_bytes([c[0], c[1]]) == uuid16);
            if found {
                return true;
            }
        }
        rest = next;
    }
    false
}

// ───────────────────────────────────────────────────────────────
// ESP-IDF Bluedroid GATT client
// ───────────────────────────────────────────────────────────────

// ───────────────────────────────────────────────────────────────
// Late connection handling (pure, host-testable)
// ───────────────────────────────────────────────────────────────

/// What the GATT client does with a completed open request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenDisposition {
    /// A handshake is waiting on this open: take the link.
    Adopt,
    /// The handshake gave up before the open landed: close it at once.
    CloseOrphan,
    /// The open failed; there is nothing to keep or close.
    Ignore,
}

/// Decide what to do with an open that completed with status `ok` while
/// a handshake was (`awaited`) or was no longer waiting for it.
pub fn open_disposition(ok: bool, awaited: bool) -> OpenDisposition {
    match (ok, awaited) {
        (false, _) => OpenDisposition::Ignore,
        (true, true) => OpenDisposition::Adopt,
        (true, false) => OpenDisposition::CloseOrphan,
    }
}

#[cfg(target_os = "espidf")]
mod esp {
    use core::sync::atomic::{AtomicBool, AtomicI32, AtomicU32, Ordering};
    use std::sync::Mutex;

    use esp_idf_svc::sys::*;
    use log::{info, warn};

    use crate::mailbox::LINK_MAILBOX;

    pub const OP_REGISTERED: u32 = 1 << 0;
    pub const OP_SCAN_PARAMS: u32 = 1 << 1;
    pub const OP_OPEN: u32 = 1 << 2;
    pub const OP_SEARCH: u32 = 1 << 3;
    pub const OP_NOTIFY_REG: u32 = 1 << 4;
    pub const OP_DESCR_WRITE: u32 = 1 << 5;

    const NO_IF: u32 = ESP_GATT_IF_NONE as u32;

    pub static GATTC_IF: AtomicU32 = AtomicU32::new(NO_IF);
    pub static CONN_ID: AtomicU32 = AtomicU32::new(0);
    pub static SVC_START: AtomicU32 = AtomicU32::new(0);
    pub static SVC_END: AtomicU32 = AtomicU32::new(0);
    pub static CHAR_HANDLE: AtomicU32 = AtomicU32::new(0);
    pub static SERVICE_UUID: AtomicU32 = AtomicU32::new(0);
    pub static LINKED: AtomicBool = AtomicBool::new(false);
    /// A handshake is blocked on `OP_OPEN`.
    pub static OPEN_AWAITED: AtomicBool = AtomicBool::new(false);
    /// The controller refused a scan start it had already accepted.
    pub static SCAN_FAILED: AtomicBool = AtomicBool::new(false);

    /// Completed operations (OP_* bits) and the status of the last one.
    pub static OPS_DONE: AtomicU32 = AtomicU32::new(0);
    pub static OP_STATUS: AtomicI32 = AtomicI32::new(0);

    /// First matching advertiser since the scan (re)started.
    /// GAP callbacks run in the Bluedroid task (not ISR), so std Mutex is safe.
    pub static DISCOVERED: Mutex<Option<([u8; 6], esp_ble_addr_type_t)>> = Mutex::new(None);

    pub fn now_ms() -> u64 {
        (unsafe { esp_timer_get_time() }) as u64 / 1_000
    }

    pub fn uuid16_to_esp(uuid: u16) -> esp_bt_uuid_t {
        let mut t: esp_bt_uuid_t = unsafe { core::mem::zeroed() };
        t.len = 2;
        t.uuid.uuid16 = uuid;
        t
    }

    fn complete(op: u32, status: i32) {
        OP_STATUS.store(status, Ordering::Release);
        OPS_DONE.fetch_or(op, Ordering::AcqRel);
    }

    /// Clear `op` before issuing the request it tracks.
    pub fn arm(op: u32) {
        OPS_DONE.fetch_and(!op, Ordering::AcqRel);
    }

    /// Block until `op` completes.  Returns its status, or `None` on timeout.
    pub fn wait_for(op: u32, timeout_ms: u32) -> Option<i32> {
        let mut waited = 0;
        while OPS_DONE.load(Ordering::Acquire) & op == 0 {
            if waited >= timeout_ms {
                return None;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
            waited += 10;
        }
        Some(OP_STATUS.load(Ordering::Acquire))
    }

    pub unsafe extern "C" fn gap_event_handler(
        event: esp_gap_ble_cb_event_t,
        param: *mut esp_ble_gap_cb_param_t,
    ) {
        match event {
            esp_gap_ble_cb_event_t_ESP_GAP_BLE_SCAN_PARAM_SET_COMPLETE_EVT => {
                let p = unsafe { &(*param).scan_param_cmpl };
                complete(OP_SCAN_PARAMS, p.status as i32);
            }
            esp_gap_ble_cb_event_t_ESP_GAP_BLE_SCAN_START_COMPLETE_EVT => {
                let p = unsafe { &(*param).scan_start_cmpl };
                if p.status != esp_bt_status_t_ESP_BT_STATUS_SUCCESS {
                    warn!("BLE GAP: scan start failed ({})", p.status);
                    SCAN_FAILED.store(true, Ordering::Release);
                }
            }
            esp_gap_ble_cb_event_t_ESP_GAP_BLE_SCAN_RESULT_EVT => {
                let p = unsafe { &(*param).scan_rst };
                if p.search_evt != esp_gap_search_evt_t_ESP_GAP_SEARCH_INQ_RES_EVT {
                    return;
                }
                let len = (p.adv_data_len as usize + p.scan_rsp_len as usize).min(p.ble_adv.len());
                let uuid = SERVICE_UUID.load(Ordering::Relaxed) as u16;
                if super::advertises_service(&p.ble_adv[..len], uuid) {
                    if let Ok(mut slot) = DISCOVERED.lock() {
                        if slot.is_none() {
                            *slot = Some((p.bda, p.ble_addr_type));
                        }
                    }
                }
            }
            _ => {}
        }
    }

    pub unsafe extern "C" fn gattc_event_handler(
        event: esp_gattc_cb_event_t,
        gattc_if: esp_gatt_if_t,
        param: *mut esp_ble_gattc_cb_param_t,
    ) {
        match event {
            esp_gattc_cb_event_t_ESP_GATTC_REG_EVT => {
                GATTC_IF.store(gattc_if as u32, Ordering::Release);
                let p = unsafe { &(*param).reg };
                complete(OP_REGISTERED, p.status as i32);
            }
            esp_gattc_cb_event_t_ESP_GATTC_OPEN_EVT => {
                let p = unsafe { &(*param).open };
                let ok = p.status == esp_gatt_status_t_ESP_GATT_OK;
                match super::open_disposition(ok, OPEN_AWAITED.load(Ordering::Acquire)) {
                    super::OpenDisposition::Adopt => {
                        CONN_ID.store(p.conn_id as u32, Ordering::Release);
                        LINKED.store(true, Ordering::Release);
                    }
                    super::OpenDisposition::CloseOrphan => {
                        warn!("BLE GATTC: closing late connection {}", p.conn_id);
                        unsafe {
                            esp_ble_gattc_close(gattc_if, p.conn_id);
                        }
                        return;
                    }
                    super::OpenDisposition::Ignore => {}
                }
                complete(OP_OPEN, p.status as i32);
            }
            esp_gattc_cb_event_t_ESP_GATTC_SEARCH_RES_EVT => {
                let p = unsafe { &(*param).search_res };
                SVC_START.store(p.start_handle as u32, Ordering::Release);
                SVC_END.store(p.end_handle as u32, Ordering::Release);
            }
            esp_gattc_cb_event_t_ESP_GATTC_SEARCH_CMPL_EVT => {
                let p = unsafe { &(*param).search_cmpl };
                complete(OP_SEARCH, p.status as i32);
            }
            esp_gattc_cb_event_t_ESP_GATTC_REG_FOR_NOTIFY_EVT => {
                let p = unsafe { &(*param).reg_for_notify };
                complete(OP_NOTIFY_REG, p.status as i32);
            }
            esp_gattc_cb_event_t_ESP_GATTC_WRITE_DESCR_EVT => {
                let p = unsafe { &(*param).write };
                complete(OP_DESCR_WRITE, p.status as i32);
            }
            esp_gattc_cb_event_t_ESP_GATTC_NOTIFY_EVT => {
                let p = unsafe { &(*param).notify };
                if p.handle as u32 != CHAR_HANDLE.load(Ordering::Acquire) {
                    return;
                }
                let raw = if p.value.is_null() {
                    &[][..]
                } else {
                    unsafe { core::slice::from_raw_parts(p.value, p.value_len as usize) }
                };
                // Rejections are logged and counted by the mailbox.
                let _ = LINK_MAILBOX.post_notification(raw, now_ms());
            }
            esp_gattc_cb_event_t_ESP_GATTC_DISCONNECT_EVT => {
                let p = unsafe { &(*param).disconnect };
                if LINKED.swap(false, Ordering::AcqRel) {
                    info!("BLE GATTC: disconnected (reason={})", p.reason);
                    LINK_MAILBOX.post_disconnect();
                }
                // Unblock a handshake step waiting on a dead link.
                complete(OP_OPEN | OP_SEARCH | OP_NOTIFY_REG | OP_DESCR_WRITE, -1);
            }
            _ => {}
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Adapter
// ───────────────────────────────────────────────────────────────

/// BLE link state as seen by the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CentralState {
    Off,
    Ready,
    Scanning,
    Connected,
    Failed,
}

pub struct BleCentral {
    state: CentralState,
    service_uuid: u16,
    measurement_uuid: u16,
    #[cfg(target_os = "espidf")]
    peer: Option<([u8; 6], esp_idf_svc::sys::esp_ble_addr_type_t)>,
    #[cfg(not(target_os = "espidf"))]
    sim_discovered: Option<PeerAddress>,
    #[cfg(not(target_os = "espidf"))]
    sim_fail_connect: Option<LinkError>,
    #[cfg(not(target_os = "espidf"))]
    sim_scan_failed: bool,
}

impl BleCentral {
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            state: CentralState::Off,
            service_uuid: config.service_uuid,
            measurement_uuid: config.measurement_uuid,
            #[cfg(target_os = "espidf")]
            peer: None,
            #[cfg(not(target_os = "espidf"))]
            sim_discovered: None,
            #[cfg(not(target_os = "espidf"))]
            sim_fail_connect: None,
            #[cfg(not(target_os = "espidf"))]
            sim_scan_failed: false,
        }
    }

    pub fn state(&self) -> CentralState {
        self.state
    }

    /// Bring up the controller and register the GATT client.
    pub fn init(&mut self) -> Result<(), LinkError> {
        self.platform_init()?;
        self.state = CentralState::Ready;
        info!(
            "BLE: central ready (service 0x{:04X}, characteristic 0x{:04X})",
            self.service_uuid, self.measurement_uuid
        );
        Ok(())
    }

    // ── Simulation hooks ──────────────────────────────────────

    /// Pretend a strap advertising the heart-rate service was seen.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_discover(&mut self, peer: PeerAddress) {
        if self.state == CentralState::Scanning {
            self.sim_discovered = Some(peer);
        }
    }

    /// Pretend the controller refused the running scan after accepting it.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_fail_scan(&mut self) {
        if self.state == CentralState::Scanning {
            self.sim_scan_failed = true;
            self.state = CentralState::Ready;
            self.sim_discovered = None;
        }
    }

    /// Make the next connect attempt fail with `err`.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_fail_next_connect(&mut self, err: LinkError) {
        self.sim_fail_connect = Some(err);
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_init(&mut self) -> Result<(), LinkError> {
        use core::sync::atomic::Ordering;
        use esp_idf_svc::sys::*;

        esp::SERVICE_UUID.store(self.service_uuid as u32, Ordering::Relaxed);

        unsafe {
            // Release classic BT memory (BLE-only mode).
            esp_bt_controller_mem_release(esp_bt_mode_t_ESP_BT_MODE_CLASSIC_BT);

            let mut bt_cfg = esp_bt_controller_config_t::default();
            self.check("bt_controller_init", esp_bt_controller_init(&mut bt_cfg))?;
            self.check(
                "bt_controller_enable",
                esp_bt_controller_enable(esp_bt_mode_t_ESP_BT_MODE_BLE),
            )?;
            self.check("bluedroid_init", esp_bluedroid_init())?;
            self.check("bluedroid_enable", esp_bluedroid_enable())?;

            esp_ble_gap_register_callback(Some(esp::gap_event_handler));
            esp_ble_gattc_register_callback(Some(esp::gattc_event_handler));

            esp::arm(esp::OP_REGISTERED);
            esp_ble_gattc_app_register(0);
            if esp::wait_for(esp::OP_REGISTERED, STEP_TIMEOUT_MS) != Some(0) {
                error!("BLE: GATT client registration failed");
                self.state = CentralState::Failed;
                return Err(LinkError::ScanStartFailed);
            }

            let mut scan_params = esp_ble_scan_params_t {
                scan_type: esp_ble_scan_type_t_BLE_SCAN_TYPE_ACTIVE,
                own_addr_type: esp_ble_addr_type_t_BLE_ADDR_TYPE_PUBLIC,
                scan_filter_policy: esp_ble_scan_filter_t_BLE_SCAN_FILTER_ALLOW_ALL,
                scan_interval: 0x50,
                scan_window: 0x30,
                scan_duplicate: esp_ble_scan_duplicate_t_BLE_SCAN_DUPLICATE_DISABLE,
            };
            esp::arm(esp::OP_SCAN_PARAMS);
            esp_ble_gap_set_scan_params(&mut scan_params);
            if esp::wait_for(esp::OP_SCAN_PARAMS, STEP_TIMEOUT_MS) != Some(0) {
                error!("BLE: scan parameter setup failed");
                self.state = CentralState::Failed;
                return Err(LinkError::ScanStartFailed);
            }
        }
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_init(&mut self) -> Result<(), LinkError> {
        info!("BLE(sim): central initialised");
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn check(&mut self, step: &str, ret: i32) -> Result<(), LinkError> {
        if ret != esp_idf_svc::sys::ESP_OK as i32 {
            error!("BLE: {} failed ({})", step, ret);
            self.state = CentralState::Failed;
            return Err(LinkError::ScanStartFailed);
        }
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn gattc_if(&self) -> esp_idf_svc::sys::esp_gatt_if_t {
        esp::GATTC_IF.load(core::sync::atomic::Ordering::Acquire) as _
    }

    #[cfg(target_os = "espidf")]
    fn conn_id(&self) -> u16 {
        esp::CONN_ID.load(core::sync::atomic::Ordering::Acquire) as u16
    }
}

// ───────────────────────────────────────────────────────────────
// TransportPort — ESP-IDF
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
impl TransportPort for BleCentral {
    fn start_scan(&mut self, reset_results: bool) -> Result<(), LinkError> {
        use esp_idf_svc::sys::*;

        if reset_results {
            if let Ok(mut slot) = esp::DISCOVERED.lock() {
                *slot = None;
            }
        }
        esp::SCAN_FAILED.store(false, core::sync::atomic::Ordering::Release);
        // Duration 0: scan until stopped.
        let ret = unsafe { esp_ble_gap_start_scanning(0) };
        if ret != ESP_OK as i32 {
            return Err(LinkError::ScanStartFailed);
        }
        self.state = CentralState::Scanning;
        Ok(())
    }

    fn stop_scan(&mut self) {
        unsafe {
            esp_idf_svc::sys::esp_ble_gap_stop_scanning();
        }
        if self.state == CentralState::Scanning {
            self.state = CentralState::Ready;
        }
    }

    fn take_scan_failure(&mut self) -> bool {
        if !esp::SCAN_FAILED.swap(false, core::sync::atomic::Ordering::AcqRel) {
            return false;
        }
        if self.state == CentralState::Scanning {
            self.state = CentralState::Ready;
        }
        true
    }

    fn take_discovered(&mut self) -> Option<PeerAddress> {
        let found = esp::DISCOVERED.lock().ok()?.take()?;
        self.peer = Some(found);
        Some(PeerAddress(found.0))
    }

    fn connect(&mut self, peer: PeerAddress) -> Result<(), LinkError> {
        use esp_idf_svc::sys::*;

        let addr_type = match self.peer {
            Some((bda, t)) if bda == peer.0 => t,
            _ => esp_ble_addr_type_t_BLE_ADDR_TYPE_PUBLIC,
        };
        let mut bda = peer.0;
        let gattc_if = self.gattc_if();

        // Open the connection.
        esp::arm(esp::OP_OPEN);
        esp::OPEN_AWAITED.store(true, core::sync::atomic::Ordering::Release);
        unsafe {
            esp_ble_gattc_open(gattc_if, bda.as_mut_ptr(), addr_type, true);
        }
        let opened = esp::wait_for(esp::OP_OPEN, STEP_TIMEOUT_MS);
        esp::OPEN_AWAITED.store(false, core::sync::atomic::Ordering::Release);
        match opened {
            Some(0) => {}
            Some(status) => {
                warn!("BLE: open failed ({})", status);
                self.state = CentralState::Ready;
                return Err(LinkError::ConnectFailed);
            }
            None => {
                // Cancel the pending direct connection; an open that still
                // lands is closed by the callback.
                warn!("BLE: open timed out, cancelling");
                unsafe {
                    esp_ble_gap_disconnect(bda.as_mut_ptr());
                }
                self.state = CentralState::Ready;
                return Err(LinkError::ConnectFailed);
            }
        }

        // Resolve the service range.
        esp::SVC_START.store(0, core::sync::atomic::Ordering::Release);
        let mut svc_uuid = esp::uuid16_to_esp(self.service_uuid);
        esp::arm(esp::OP_SEARCH);
        unsafe {
            esp_ble_gattc_search_service(gattc_if, self.conn_id(), &mut svc_uuid);
        }
        let searched = esp::wait_for(esp::OP_SEARCH, STEP_TIMEOUT_MS);
        let start = esp::SVC_START.load(core::sync::atomic::Ordering::Acquire) as u16;
        if searched != Some(0) || start == 0 {
            self.disconnect();
            return Err(LinkError::CharacteristicMissing);
        }
        let end = esp::SVC_END.load(core::sync::atomic::Ordering::Acquire) as u16;

        // Resolve the measurement characteristic.
        let mut elem: esp_gattc_char_elem_t = unsafe { core::mem::zeroed() };
        let mut count: u16 = 1;
        let status = unsafe {
            esp_ble_gattc_get_char_by_uuid(
                gattc_if,
                self.conn_id(),
                start,
                end,
                esp::uuid16_to_esp(self.measurement_uuid),
                &mut elem,
                &mut count,
            )
        };
        if status != esp_gatt_status_t_ESP_GATT_OK || count == 0 {
            self.disconnect();
            return Err(LinkError::CharacteristicMissing);
        }
        esp::CHAR_HANDLE.store(elem.char_handle as u32, core::sync::atomic::Ordering::Release);

        self.state = CentralState::Connected;
        info!("BLE: connected, measurement handle {}", elem.char_handle);
        Ok(())
    }

    fn enable_notifications(&mut self) -> Result<(), LinkError> {
        use esp_idf_svc::sys::*;

        let Some((mut bda, _)) = self.peer else {
            return Err(LinkError::NotifyArmFailed);
        };
        let gattc_if = self.gattc_if();
        let char_handle = esp::CHAR_HANDLE.load(core::sync::atomic::Ordering::Acquire) as u16;

        esp::arm(esp::OP_NOTIFY_REG);
        unsafe {
            esp_ble_gattc_register_for_notify(gattc_if, bda.as_mut_ptr(), char_handle);
        }
        if esp::wait_for(esp::OP_NOTIFY_REG, STEP_TIMEOUT_MS) != Some(0) {
            return Err(LinkError::NotifyArmFailed);
        }

        let mut descr: esp_gattc_descr_elem_t = unsafe { core::mem::zeroed() };
        let mut count: u16 = 1;
        let status = unsafe {
            esp_ble_gattc_get_descr_by_char_handle(
                gattc_if,
                self.conn_id(),
                char_handle,
                esp::uuid16_to_esp(CCCD_UUID),
                &mut descr,
                &mut count,
            )
        };
        if status != esp_gatt_status_t_ESP_GATT_OK || count == 0 {
            warn!("BLE: measurement characteristic has no CCCD");
            return Err(LinkError::NotifyArmFailed);
        }

        let mut value = CCCD_ENABLE_NOTIFY;
        esp::arm(esp::OP_DESCR_WRITE);
        unsafe {
            esp_ble_gattc_write_char_descr(
                gattc_if,
                self.conn_id(),
                descr.handle,
                value.len() as u16,
                value.as_mut_ptr(),
                esp_gatt_write_type_t_ESP_GATT_WRITE_TYPE_RSP,
                esp_gatt_auth_req_t_ESP_GATT_AUTH_REQ_NONE,
            );
        }
        if esp::wait_for(esp::OP_DESCR_WRITE, STEP_TIMEOUT_MS) != Some(0) {
            return Err(LinkError::NotifyArmFailed);
        }

        info!("BLE: notifications armed");
        Ok(())
    }

    fn disconnect(&mut self) {
        // Our own teardown is not a link loss.
        esp::LINKED.store(false, core::sync::atomic::Ordering::Release);
        unsafe {
            esp_idf_svc::sys::esp_ble_gattc_close(self.gattc_if(), self.conn_id());
        }
        self.state = CentralState::Ready;
    }
}

// ───────────────────────────────────────────────────────────────
// TransportPort — host simulation
// ───────────────────────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
impl TransportPort for BleCentral {
    fn start_scan(&mut self, reset_results: bool) -> Result<(), LinkError> {
        if reset_results {
            self.sim_discovered = None;
        }
        self.sim_scan_failed = false;
        self.state = CentralState::Scanning;
        Ok(())
    }

    fn stop_scan(&mut self) {
        if self.state == CentralState::Scanning {
            self.state = CentralState::Ready;
        }
    }

    fn take_scan_failure(&mut self) -> bool {
        core::mem::take(&mut self.sim_scan_failed)
    }

    fn take_discovered(&mut self) -> Option<PeerAddress> {
        self.sim_discovered.take()
    }

    fn connect(&mut self, peer: PeerAddress) -> Result<(), LinkError> {
        if let Some(err) = self.sim_fail_connect.take() {
            return Err(err);
        }
        info!("BLE(sim): connected to {}", peer);
        self.state = CentralState::Connected;
        Ok(())
    }

    fn enable_notifications(&mut self) -> Result<(), LinkError> {
        if self.state == CentralState::Connected {
            Ok(())
        } else {
            Err(LinkError::NotifyArmFailed)
        }
    }

    fn disconnect(&mut self) {
        self.state = CentralState::Ready;
    }
}
