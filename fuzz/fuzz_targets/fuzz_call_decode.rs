#![no_main]

use covenant_governance::GovernorCall;
use covenant_timelock::TimelockCall;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Payloads addressed to the governor or the timelock come straight from
    // proposal actions. Decoding must reject garbage without panicking.
    if let Ok(call) = GovernorCall::decode(data) {
        let again = GovernorCall::decode(&call.encode()).expect("re-encoded call decodes");
        assert_eq!(again, call);
    }

    if let Ok(call) = TimelockCall::decode(data) {
        let again = TimelockCall::decode(&call.encode()).expect("re-encoded call decodes");
        assert_eq!(again, call);
    }
});
