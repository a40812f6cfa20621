//! Definitions of Solidity types and functions called during deployment

use alloy_sol_types::sol;

sol! {
    /// Eligibility constraints checked against a TD3 query proof
    #[derive(Debug, PartialEq, Eq)]
    struct VoteParams {
        uint256 identityCreationTimestampUpperBound;
        uint256[] citizenshipWhitelist;
        uint256 birthDateLowerbound;
        uint256 expirationDateLowerBound;
        uint256 identityCounterUpperBound;
    }

    /// The transfer lists a blacklist transfer contract starts with
    #[derive(Debug, PartialEq, Eq)]
    struct InitialLists {
        address[] whitelist;
        address[] blacklist;
        uint256[] nationalityWhitelist;
    }

    function __ZikuaniVote_init(
        VoteParams params,
        address credentialIssuer,
        address registrationSMT,
        address verifier,
        uint256 selector
    ) external;

    function __ZikuaniBlacklistTransfer_init(
        VoteParams params,
        InitialLists lists,
        address credentialIssuer,
        address registrationSMT,
        address verifier,
        uint256 selector
    ) external;
}
