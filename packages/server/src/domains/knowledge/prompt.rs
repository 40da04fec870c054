//! System prompt construction for the sales assistant
//!
//! Livechat and roleplay training share the same core (identity, knowledge,
//! guidelines, training memory, history); roleplay adds the scenario and
//! trainer corrections, and revisions use their own structure.

use typed_builder::TypedBuilder;

use super::models::{Guideline, KnowledgeEntry};

/// A roleplay training scenario
#[derive(Debug, Clone, Default)]
pub struct Scenario {
    pub name: String,
    pub description: String,
    pub customer_type: String,
    pub success_criteria: Vec<String>,
}

/// A trainer asking for a rewrite of a previous answer
#[derive(Debug, Clone)]
pub struct Revision {
    pub previous_response: String,
    pub feedback_message: String,
    pub customer_question: String,
    pub needs_shorter: bool,
    pub needs_longer: bool,
}

const SHORTER_CUES: [&str; 4] = ["less word", "shorter", "brief", "concise"];
const LONGER_CUES: [&str; 3] = ["more detail", "longer", "elaborate"];

impl Revision {
    /// Build a revision, reading length cues from the feedback text.
    pub fn from_feedback(
        previous_response: impl Into<String>,
        feedback_message: impl Into<String>,
        customer_question: impl Into<String>,
    ) -> Self {
        let feedback_message = feedback_message.into();
        let lower = feedback_message.to_lowercase();

        Self {
            previous_response: previous_response.into(),
            needs_shorter: SHORTER_CUES.iter().any(|cue| lower.contains(cue)),
            needs_longer: LONGER_CUES.iter().any(|cue| lower.contains(cue)),
            feedback_message,
            customer_question: customer_question.into(),
        }
    }
}

#[derive(TypedBuilder)]
pub struct PromptOptions<'a> {
    #[builder(setter(into))]
    pub staff_name: &'a str,
    #[builder(setter(into))]
    pub staff_role: &'a str,
    #[builder(default)]
    pub knowledge: Vec<&'a KnowledgeEntry>,
    #[builder(default)]
    pub guidelines: &'a [Guideline],
    /// Lessons grouped by scenario
    #[builder(default)]
    pub training_memory: &'a [(String, Vec<String>)],
    /// Pre-formatted transcript
    #[builder(default)]
    pub conversation_history: &'a str,
    #[builder(default, setter(strip_option))]
    pub language: Option<&'a str>,
    #[builder(default)]
    pub has_image: bool,
    #[builder(default, setter(strip_option))]
    pub user_name: Option<&'a str>,
    #[builder(default, setter(strip_option))]
    pub scenario: Option<&'a Scenario>,
    /// Trainer corrections relevant to this scenario
    #[builder(default)]
    pub feedback_memory: &'a [String],
    #[builder(default, setter(strip_option))]
    pub revision: Option<&'a Revision>,
}

fn knowledge_context(entries: &[&KnowledgeEntry]) -> String {
    if entries.is_empty() {
        return String::new();
    }

    let lines: Vec<String> = entries
        .iter()
        .map(|e| {
            let mut line = String::from("- ");
            if !e.category.is_empty() {
                line.push_str(&format!("[{}] ", e.category));
            }
            if let Some(topic) = e.topic.as_deref().filter(|t| !t.is_empty()) {
                line.push_str(&format!("{}: ", topic));
            }
            line.push_str(&e.content);
            line
        })
        .collect();

    format!(
        "\n\n📚 KNOWLEDGE BASE - CRITICAL: ONLY USE INFORMATION FROM THIS LIST:\n{}\n\n⚠️ DO NOT mention any products, prices, or information that are NOT listed above.",
        lines.join("\n")
    )
}

const RULES_WITHOUT_KNOWLEDGE: &str = r#"1. Provide helpful, accurate information
2. Be professional and friendly
3. If you're unsure, say "Let me check on that for you""#;

const RULES_WITH_KNOWLEDGE: &str = r#"YOU MUST FOLLOW THESE RULES OR YOU WILL SEND CUSTOMERS TO COMPETITOR BRANDS:

1. ⛔ BANNED: NEVER mention competitor brands like "The Ordinary", "Paula's Choice", "Neutrogena", "CeraVe", "La Roche-Posay" or ANY brand not in the knowledge base
2. ⛔ BANNED: NEVER recommend products from other companies
3. ⛔ BANNED: NEVER make up product names
4. ⛔ BANNED: NEVER invent prices, features, ingredients, or details
5. ✅ REQUIRED: ONLY mention products/information EXPLICITLY listed in the KNOWLEDGE BASE above
6. ✅ REQUIRED: When customers ask "what products do you have?", "any more products?", "show me products", etc. → LIST products from the knowledge base!
7. ✅ REQUIRED: If asked about a SPECIFIC product NOT in knowledge base, say: "We don't have that specific product yet, but I'll pass your interest along to our team!"
8. ⛔ BANNED: NEVER say "knowledge base", "database", "system" to customers
9. ✅ REQUIRED: Speak as "we", "our", "us" - you ARE this company

IMPORTANT CLARIFICATION:
- General questions like "what products?", "any more?", "show me what you have" = LIST our products from knowledge base
- Specific questions like "do you have Product X?" where X is NOT in knowledge base = "We don't currently offer that"
- DO NOT say "we don't offer that" when customer asks to see what products exist!

IF ASKED ABOUT SOMETHING SPECIFIC NOT IN KNOWLEDGE BASE:
- Say: "We don't currently offer that, but I appreciate your feedback and will share your interest with our team!"
- DO NOT recommend competitor products
- DO NOT make up product names from your training data"#;

fn guidelines_context(guidelines: &[Guideline]) -> String {
    if guidelines.is_empty() {
        return String::new();
    }

    let blocks: Vec<String> = guidelines
        .iter()
        .map(|g| format!("**{}**\n{}", g.title, g.content))
        .collect();
    format!(
        "\n\n📋 TRAINING GUIDELINES - FOLLOW THESE RULES:\n{}",
        blocks.join("\n\n")
    )
}

fn training_memory_context(memory: &[(String, Vec<String>)], staff_name: &str, staff_role: &str) -> String {
    if memory.is_empty() {
        return String::new();
    }

    let blocks: Vec<String> = memory
        .iter()
        .map(|(scenario, lessons)| {
            let lessons: Vec<String> = lessons.iter().map(|l| format!("  • {}", l)).collect();
            format!("Scenario: {}\nLessons:\n{}", scenario, lessons.join("\n"))
        })
        .collect();

    format!(
        "\n\n📝 TRAINING MEMORY - IMPORTANT LESSONS LEARNED:\nYou are {} ({}). Apply these lessons from your training:\n\n{}",
        staff_name,
        staff_role,
        blocks.join("\n\n")
    )
}

/// Display name for a language code; unknown codes are used verbatim.
pub fn language_name(code: &str) -> &str {
    match code {
        "en" => "English",
        "zh-CN" | "cn" => "Simplified Chinese",
        "zh-TW" | "tw" => "Traditional Chinese",
        "vi" => "Vietnamese",
        other => other,
    }
}

fn language_instruction(language: Option<&str>) -> String {
    match language.map(str::trim) {
        None | Some("") | Some("en") => String::new(),
        Some(code) => {
            let name = language_name(code);
            format!(
                "\n\n🌍 LANGUAGE REQUIREMENT: You MUST respond ONLY in {name}. The user may write in any language, but your responses must be in {name}.\n"
            )
        }
    }
}

fn vision_instruction(has_image: bool) -> &'static str {
    if !has_image {
        return "";
    }
    "\n\n📷 IMAGE ANALYSIS: The user has provided an image. Carefully analyze the image content and incorporate your observations into your response. Describe what you see, read any text in the image, and provide relevant insights based on the visual information.\n"
}

fn greeting_instruction(user_name: Option<&str>) -> String {
    match user_name.map(str::trim).filter(|n| !n.is_empty()) {
        None => String::new(),
        Some(name) => format!(
            "\n\n👋 PERSONALIZED GREETING: The user's name is {name}. If this is the first message in the conversation (no conversation history), start your response with a warm, personalized greeting using their name (e.g., \"Hi {name}!\" or \"Hello {name}, nice to meet you!\"). For subsequent messages, you can occasionally use their name naturally in conversation.\n"
        ),
    }
}

fn scenario_context(scenario: &Scenario, feedback_memory: &[String]) -> String {
    let criteria = if scenario.success_criteria.is_empty() {
        "- Complete the training scenario successfully".to_string()
    } else {
        scenario
            .success_criteria
            .iter()
            .map(|c| format!("- {}", c))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let mut text = format!(
        "\nTRAINING SCENARIO: {}\nDESCRIPTION: {}\nCUSTOMER TYPE: {}\n\nSUCCESS CRITERIA TO ACHIEVE:\n{}",
        scenario.name, scenario.description, scenario.customer_type, criteria
    );

    if !feedback_memory.is_empty() {
        let corrections: Vec<String> = feedback_memory
            .iter()
            .enumerate()
            .map(|(i, fb)| format!("{}. CORRECTION REQUIRED: {}", i + 1, fb))
            .collect();

        text.push_str(&format!(
            r#"

🚨🚨🚨 CRITICAL TRAINING FEEDBACK - YOU MADE THESE MISTAKES BEFORE - DO NOT REPEAT THEM! 🚨🚨🚨

The trainer has provided the following corrections to your PREVIOUS RESPONSES. You MUST fix these issues NOW:

{}

⚠️ MANDATORY: You will be RE-EVALUATED on whether you fixed these issues. If you repeat the same mistakes, you FAIL.
⚠️ READ each correction above carefully and APPLY IT to your response.
⚠️ If feedback says "don't mention XR5000", then NEVER mention XR5000 or similar made-up products EVER AGAIN.
⚠️ If feedback says you're hallucinating, STOP making things up and use ONLY the knowledge base.

These corrections OVERRIDE everything else. Fix them NOW!"#,
            corrections.join("\n")
        ));
    }

    text.push_str(&format!(
        r#"

CONVERSATION MANAGEMENT:
- READ THE ENTIRE CONVERSATION HISTORY to understand the context and emotional state
- PAY ATTENTION to how the customer's emotions are evolving (frustration, escalation, etc.)
- ADAPT your response based on the conversation flow - DO NOT repeat previous responses
- If the customer is getting more frustrated, acknowledge their escalating concerns and adjust your approach
- Focus on achieving the scenario success criteria listed above
- Adapt your approach to the customer's personality ({})
- Be helpful, professional, and solution-oriented
- NEVER give the same or similar response twice - each response must progress the conversation

RESPONSE GUIDELINES:
- Use ONLY information from the knowledge base below
- If asked about specific products not in the knowledge base, offer to connect them with a specialist or check availability
- Focus on understanding customer needs and providing helpful guidance within your knowledge
- Be honest about limitations - it's better to admit you don't know than to make up information"#,
        scenario.customer_type
    ));

    text
}

fn revision_context(staff_name: &str, revision: &Revision, scenario: Option<&Scenario>) -> String {
    let scenario_name = scenario.map(|s| s.name.as_str()).filter(|n| !n.is_empty()).unwrap_or("General");
    let customer_type = scenario
        .map(|s| s.customer_type.as_str())
        .filter(|t| !t.is_empty())
        .unwrap_or("General");

    let mut text = format!(
        r#"You are {staff_name} receiving training feedback. You must REVISE your previous response based on the trainer's specific feedback.

TRAINING CONTEXT:
Scenario: {scenario_name}
Customer Type: {customer_type}

CUSTOMER'S QUESTION:
"{}"

YOUR PREVIOUS RESPONSE (THAT NEEDS REVISION):
"{}"

🚨 TRAINER'S FEEDBACK ON YOUR RESPONSE:
"{}""#,
        revision.customer_question, revision.previous_response, revision.feedback_message
    );

    if revision.needs_shorter {
        let words = revision.previous_response.split(' ').count();
        text.push_str(&format!(
            "\n\n⚠️ CRITICAL: The trainer wants a SHORTER response! Your previous response was {} words.\nMake your revised response SIGNIFICANTLY shorter (aim for 30-50 words MAX). Be concise and direct!",
            words
        ));
    }
    if revision.needs_longer {
        text.push_str("\n\n⚠️ CRITICAL: The trainer wants MORE DETAIL! Your previous response was too brief.\nExpand your revised response with more explanation, examples, and helpful details.");
    }

    let mut points = vec!["   - Directly addresses the trainer's feedback"];
    if revision.needs_shorter {
        points.push("   - Is MUCH SHORTER than your previous response (cut it by at least 50%)");
    }
    if revision.needs_longer {
        points.push("   - Is MORE DETAILED than your previous response (at least 2x longer)");
    }
    points.extend([
        "   - Fixes the specific issues mentioned",
        "   - Maintains your professional, warm tone",
        "   - Provides better, more helpful guidance to the customer",
    ]);

    text.push_str(&format!(
        r#"

REVISION INSTRUCTIONS:
1. Read the trainer's feedback carefully
2. Identify what was wrong or missing in your previous response
3. Write a COMPLETELY NEW response that:
{}
4. DO NOT just repeat your previous response
5. DO NOT ignore the trainer's feedback
6. SHOW that you learned from the feedback by making substantial improvements

Now provide your REVISED response to the customer's question above:"#,
        points.join("\n")
    ));

    text
}

/// Build the system prompt.
pub fn build_prompt(opts: &PromptOptions<'_>) -> String {
    let knowledge = knowledge_context(&opts.knowledge);
    let guidelines = guidelines_context(opts.guidelines);
    let memory = training_memory_context(opts.training_memory, opts.staff_name, opts.staff_role);

    if let Some(revision) = opts.revision {
        return format!(
            "{}{}{}{}",
            revision_context(opts.staff_name, revision, opts.scenario),
            knowledge,
            guidelines,
            memory
        );
    }

    let mut parts: Vec<String> = Vec::new();

    match opts.scenario {
        Some(scenario) => {
            parts.push(format!(
                "You are {}, a {} representative helping a customer.",
                opts.staff_name, opts.staff_role
            ));
            parts.push(scenario_context(scenario, opts.feedback_memory));
        }
        None => parts.push(format!(
            "You are {}, a {} for THIS company ONLY.",
            opts.staff_name, opts.staff_role
        )),
    }

    parts.push(knowledge);
    parts.push(guidelines);
    parts.push(memory);

    parts.push(language_instruction(opts.language));
    parts.push(vision_instruction(opts.has_image).to_string());
    parts.push(greeting_instruction(opts.user_name));

    if !opts.conversation_history.is_empty() {
        parts.push(format!("\nRECENT CONVERSATION:\n{}\n", opts.conversation_history));
    }

    parts.push("\n🚨🚨🚨 ABSOLUTE RULES - VIOLATION WILL CAUSE SEVERE HARM 🚨🚨🚨\n".to_string());
    parts.push(
        if opts.knowledge.is_empty() {
            RULES_WITHOUT_KNOWLEDGE
        } else {
            RULES_WITH_KNOWLEDGE
        }
        .to_string(),
    );

    parts.push("\nKeep responses clear and professional (2-4 sentences).".to_string());

    parts
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Reminder appended to each customer message when knowledge is present.
pub fn build_user_reminder(has_knowledge: bool) -> &'static str {
    if has_knowledge {
        "\n\n🚨 REMINDER: ONLY mention products/information EXPLICITLY LISTED in the knowledge base above. DO NOT mention competitor brands or make up information."
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{BusinessUnitId, GuidelineId, KnowledgeEntryId};
    use chrono::Utc;

    fn entry(category: &str, topic: Option<&str>, content: &str) -> KnowledgeEntry {
        KnowledgeEntry {
            id: KnowledgeEntryId::new(),
            business_unit_id: BusinessUnitId::new(),
            category: category.to_string(),
            topic: topic.map(str::to_string),
            content: content.to_string(),
            keywords: vec![],
            confidence: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn guideline(title: &str, content: &str) -> Guideline {
        Guideline {
            id: GuidelineId::new(),
            business_unit_id: BusinessUnitId::new(),
            category: "general".into(),
            title: title.into(),
            content: content.into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn livechat_sections_appear_in_order() {
        let serum = entry("products", Some("Glow Serum"), "Vitamin C serum, $45");
        let guidelines = vec![guideline("Tone", "Be warm")];
        let memory = vec![("Price objection".to_string(), vec!["Mention bundles".to_string()])];

        let prompt = build_prompt(
            &PromptOptions::builder()
                .staff_name("Mia")
                .staff_role("skin coach")
                .knowledge(vec![&serum])
                .guidelines(&guidelines)
                .training_memory(&memory)
                .conversation_history("Customer: hi\nAI: hello")
                .language("vi")
                .user_name("Lan")
                .build(),
        );

        assert!(prompt.starts_with("You are Mia, a skin coach for THIS company ONLY."));
        assert!(prompt.contains("- [products] Glow Serum: Vitamin C serum, $45"));

        let order = [
            "📚 KNOWLEDGE BASE",
            "📋 TRAINING GUIDELINES",
            "📝 TRAINING MEMORY",
            "respond ONLY in Vietnamese",
            "👋 PERSONALIZED GREETING: The user's name is Lan.",
            "RECENT CONVERSATION:\nCustomer: hi",
            "ABSOLUTE RULES",
            "YOU MUST FOLLOW THESE RULES",
            "Keep responses clear and professional (2-4 sentences).",
        ];
        let positions: Vec<usize> = order
            .iter()
            .map(|needle| prompt.find(needle).unwrap_or_else(|| panic!("missing {needle}")))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(!prompt.contains("IMAGE ANALYSIS"));
    }

    #[test]
    fn without_knowledge_uses_short_rules() {
        let prompt = build_prompt(
            &PromptOptions::builder()
                .staff_name("Mia")
                .staff_role("coach")
                .language("en")
                .has_image(true)
                .build(),
        );

        assert!(prompt.contains("3. If you're unsure, say \"Let me check on that for you\""));
        assert!(!prompt.contains("KNOWLEDGE BASE -"));
        assert!(!prompt.contains("LANGUAGE REQUIREMENT"));
        assert!(prompt.contains("📷 IMAGE ANALYSIS"));
        assert_eq!(build_user_reminder(false), "");
        assert!(build_user_reminder(true).contains("REMINDER"));
    }

    #[test]
    fn roleplay_includes_scenario_and_corrections() {
        let scenario = Scenario {
            name: "Refund request".into(),
            description: "Customer wants money back".into(),
            customer_type: "Frustrated".into(),
            success_criteria: vec![],
        };
        let feedback = vec!["Don't promise refunds".to_string()];

        let prompt = build_prompt(
            &PromptOptions::builder()
                .staff_name("Mia")
                .staff_role("support")
                .scenario(&scenario)
                .feedback_memory(&feedback)
                .build(),
        );

        assert!(prompt.starts_with("You are Mia, a support representative helping a customer."));
        assert!(prompt.contains("TRAINING SCENARIO: Refund request"));
        assert!(prompt.contains("- Complete the training scenario successfully"));
        assert!(prompt.contains("1. CORRECTION REQUIRED: Don't promise refunds"));
        assert!(prompt.contains("customer's personality (Frustrated)"));
    }

    #[test]
    fn revision_detects_length_cues() {
        let revision = Revision::from_feedback(
            "one two three four",
            "Too long, please be more CONCISE",
            "Is it safe for kids?",
        );
        assert!(revision.needs_shorter);
        assert!(!revision.needs_longer);

        let prompt = build_prompt(
            &PromptOptions::builder()
                .staff_name("Mia")
                .staff_role("coach")
                .revision(&revision)
                .build(),
        );

        assert!(prompt.starts_with("You are Mia receiving training feedback."));
        assert!(prompt.contains("Scenario: General"));
        assert!(prompt.contains("Your previous response was 4 words."));
        assert!(prompt.contains("Is MUCH SHORTER"));
        assert!(!prompt.contains("ABSOLUTE RULES"));
    }

    #[test]
    fn language_codes_map_to_names() {
        assert_eq!(language_name("cn"), "Simplified Chinese");
        assert_eq!(language_name("zh-TW"), "Traditional Chinese");
        assert_eq!(language_name("th"), "th");
    }
}
