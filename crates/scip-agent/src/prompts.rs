//! Prompt Templates
//!
//! System messages and user prompts for every model call the platform makes.

use std::collections::BTreeMap;

pub const GENERATION_SYSTEM: &str = "You are an expert Solidity developer specializing in secure, gas-efficient smart contracts. Your task is to generate production-ready smart contract code based on user requirements.";

pub const VALIDATION_SYSTEM: &str = "You are an expert smart contract security auditor. Analyze the given Solidity contract and return a JSON response with your findings.";

pub const ANALYSIS_SYSTEM: &str = "You are an expert Solidity analyzer that extracts structured information from smart contracts.";

pub const INTERACTION_SYSTEM: &str = "You are an expert in blockchain user experience design, specializing in creating intuitive interaction flows for smart contracts.";

/// Known contract types and the template each one maps to
const CONTRACT_TEMPLATES: &[(&str, &str)] = &[
    ("token", "ERC20 token contract with customizable features"),
    ("nft", "ERC721 NFT contract with minting and royalties"),
    ("dao", "Decentralized Autonomous Organization with voting"),
    ("marketplace", "Marketplace for buying and selling digital assets"),
    ("escrow", "Escrow service for secure transactions"),
    ("staking", "Staking contract with rewards distribution"),
    ("multisig", "Multi-signature wallet"),
];

const CUSTOM_TEMPLATE: &str = "Custom smart contract based on description";

/// Template description for a contract type
pub fn contract_template(contract_type: &str) -> &'static str {
    CONTRACT_TEMPLATES
        .iter()
        .find(|(name, _)| *name == contract_type)
        .map(|(_, template)| *template)
        .unwrap_or(CUSTOM_TEMPLATE)
}

/// Template for contract generation, validation and analysis prompts
pub struct ContractPromptTemplate;

impl ContractPromptTemplate {
    /// Build the generation prompt. Parameters are listed in key order.
    pub fn build_generation_prompt(
        description: &str,
        contract_type: &str,
        params: &BTreeMap<String, serde_json::Value>,
    ) -> String {
        let template = contract_template(contract_type);
        let params_str = params
            .iter()
            .map(|(key, value)| match value {
                serde_json::Value::String(s) => format!("- {key}: {s}"),
                other => format!("- {key}: {other}"),
            })
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"Generate a secure, gas-efficient, and well-documented Solidity smart contract based on the following requirements:

CONTRACT TYPE: {contract_type}
TEMPLATE: {template}

DESCRIPTION:
{description}

PARAMETERS:
{params_str}

Requirements:
1. Use the latest stable Solidity version
2. Follow best security practices and include protection against common vulnerabilities
3. Optimize for gas efficiency
4. Include comprehensive NatSpec documentation
5. Implement appropriate access control mechanisms
6. Add thorough error handling with custom error messages
7. Include events for all significant state changes

Return only the Solidity code without any additional explanation.
"#
        )
    }

    pub fn build_validation_prompt(contract_code: &str) -> String {
        format!(
            r#"Please analyze the following Solidity smart contract for:
1. Security vulnerabilities (reentrancy, overflow/underflow, etc.)
2. Gas optimization issues
3. Best practice violations
4. Logical errors or edge cases

For each issue found, provide:
- The specific line or function with the issue
- A description of the problem
- A suggested fix

Contract code:
```solidity
{contract_code}
```

Format your response as JSON with the following structure:
{{
    "is_valid": true/false,
    "issues": [
        {{
            "type": "security|gas|best_practice|logical",
            "severity": "high|medium|low",
            "location": "function name or line number",
            "description": "Description of the issue",
            "suggestion": "Suggested fix"
        }}
    ],
    "suggestions": [
        "General improvement suggestion 1",
        "General improvement suggestion 2"
    ]
}}
"#
        )
    }

    pub fn build_analysis_prompt(contract_code: &str) -> String {
        format!(
            r#"Please analyze the following Solidity smart contract and extract its structural components.
Return the analysis as a JSON object with the following structure:

```json
{{
    "functions": [
        {{
            "name": "functionName",
            "visibility": "public|private|internal|external",
            "modifiers": ["modifier1", "modifier2"],
            "parameters": [
                {{"name": "param1", "type": "uint256"}}
            ],
            "returns": [
                {{"type": "bool"}}
            ],
            "description": "Brief description of what this function does"
        }}
    ],
    "variables": [
        {{
            "name": "variableName",
            "type": "address",
            "visibility": "public|private|internal",
            "constant": true/false
        }}
    ],
    "events": [
        {{
            "name": "EventName",
            "parameters": [
                {{"name": "param1", "type": "address", "indexed": true}}
            ]
        }}
    ],
    "modifiers": [
        {{
            "name": "modifierName",
            "parameters": [
                {{"name": "param1", "type": "uint256"}}
            ]
        }}
    ],
    "inheritance": ["BaseContract1", "BaseContract2"],
    "summary": {{
        "contractName": "MyContract",
        "description": "A high-level description of what this contract does",
        "main_functionality": "The primary purpose of this contract",
        "security_features": ["Feature1", "Feature2"],
        "data_flow": ["Step 1: User calls function X", "Step 2: Function X updates state Y"]
    }}
}}
```

Contract code:
```solidity
{contract_code}
```
"#
        )
    }

    /// Ask for user interaction scenarios given a serialized summary and callable functions
    pub fn build_interaction_prompt(summary_json: &str, functions_json: &str) -> String {
        format!(
            r#"Based on this smart contract structure, generate 3-5 typical user interaction scenarios.
Each scenario should represent a realistic way a user might interact with this contract.

Contract summary: {summary_json}

Available public/external functions:
{functions_json}

For each scenario, provide:
1. A name for the scenario
2. A brief description of what the user is trying to achieve
3. A sequence of 2-5 steps showing the interactions with the contract

Format your response as a JSON object of the form {{"scenarios": [{{"name": "...", "description": "...", "steps": ["..."]}}]}}.
"#
        )
    }
}
