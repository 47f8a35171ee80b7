//! Prompt assembly: curriculum day + practices + user message.
//!
//! Assembly is deterministic: identical inputs always produce identical
//! output. Curriculum fields are interpolated verbatim and every labelled
//! line is present even when its field is absent.

use niagate_core::curriculum::{CurriculumDay, Practice};

/// Everything the assembler reads for one call.
pub struct PromptInput<'a> {
    pub program_id: &'a str,
    pub day_number: f64,
    pub day: &'a CurriculumDay,
    pub practices: &'a [Practice],
    pub message: &'a str,
}

/// Render the prompt sent as the sole user turn.
pub fn assemble(input: &PromptInput<'_>) -> String {
    let day = input.day;
    let field = |v: &Option<String>| v.as_deref().unwrap_or("").to_string();

    let practices = input
        .practices
        .iter()
        .map(|p| format!("- {}: {}", p.name, p.description))
        .collect::<Vec<_>>()
        .join("\n");

    let out = format!(
        "\nPROGRAM CONTEXT:\n\n\
         ProgramId: {program_id}\n\
         Day: {day_number}\n\n\
         Title: {title}\n\
         Focus: {focus}\n\
         Description: {description}\n\n\
         Mental Content: {mental}\n\
         Somatic Content: {somatic}\n\
         Tea Ritual: {tea}\n\
         Morning Elixir: {elixir}\n\
         Seed Protocol: {seed}\n\
         Journaling Question: {journaling}\n\n\
         Somatic Practices:\n\
         {practices}\n\n\
         USER MESSAGE:\n\
         {message}\n",
        program_id = input.program_id,
        day_number = format_day_number(input.day_number),
        title = field(&day.title),
        focus = field(&day.focus),
        description = field(&day.description),
        mental = field(&day.mental_content),
        somatic = field(&day.somatic_content),
        tea = field(&day.tea_ritual_content),
        elixir = field(&day.morning_elixir),
        seed = field(&day.seed_protocol),
        journaling = field(&day.journaling_question),
        message = input.message,
    );

    out.trim().to_string()
}

/// Integral day numbers print without a decimal point.
pub fn format_day_number(day_number: f64) -> String {
    if day_number.fract() == 0.0 && day_number.abs() < 1e15 {
        format!("{}", day_number as i64)
    } else {
        format!("{day_number}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_day() -> CurriculumDay {
        CurriculumDay {
            program_id: "wakeup_7_days".into(),
            day_number: 3,
            title: Some("დამიწება".into()),
            focus: Some("სუნთქვა".into()),
            tea_ritual_content: Some("მწვანე ჩაი".into()),
            journaling_question: Some("რა შეამჩნიე?".into()),
            ..Default::default()
        }
    }

    #[test]
    fn full_template_layout() {
        let day = sample_day();
        let practices = vec![
            Practice {
                name: "Box breathing".into(),
                description: "4-4-4-4".into(),
            },
            Practice {
                name: "Body scan".into(),
                description: "".into(),
            },
        ];
        let prompt = assemble(&PromptInput {
            program_id: "wakeup_7_days",
            day_number: 3.0,
            day: &day,
            practices: &practices,
            message: "რას ნიშნავს დღევანდელი ფოკუსი?",
        });

        let expected = "PROGRAM CONTEXT:\n\n\
            ProgramId: wakeup_7_days\n\
            Day: 3\n\n\
            Title: დამიწება\n\
            Focus: სუნთქვა\n\
            Description: \n\n\
            Mental Content: \n\
            Somatic Content: \n\
            Tea Ritual: მწვანე ჩაი\n\
            Morning Elixir: \n\
            Seed Protocol: \n\
            Journaling Question: რა შეამჩნიე?\n\n\
            Somatic Practices:\n\
            - Box breathing: 4-4-4-4\n\
            - Body scan: \n\n\
            USER MESSAGE:\n\
            რას ნიშნავს დღევანდელი ფოკუსი?";
        assert_eq!(prompt, expected);
    }

    #[test]
    fn no_practices_leaves_empty_block() {
        let day = CurriculumDay::default();
        let prompt = assemble(&PromptInput {
            program_id: "p",
            day_number: 1.0,
            day: &day,
            practices: &[],
            message: "hi",
        });
        assert!(prompt.contains("Somatic Practices:\n\n\nUSER MESSAGE:\nhi"));
        assert!(prompt.starts_with("PROGRAM CONTEXT:"));
        assert!(prompt.ends_with("hi"));
    }

    #[test]
    fn curriculum_text_is_verbatim() {
        let day = CurriculumDay {
            description: Some("  {not a placeholder} $1 \\n ".into()),
            ..Default::default()
        };
        let prompt = assemble(&PromptInput {
            program_id: "p",
            day_number: 1.0,
            day: &day,
            practices: &[],
            message: "m",
        });
        assert!(prompt.contains("Description:   {not a placeholder} $1 \\n \n"));
    }

    #[test]
    fn deterministic() {
        let day = sample_day();
        let input = PromptInput {
            program_id: "wakeup_7_days",
            day_number: 3.0,
            day: &day,
            practices: &[],
            message: "m",
        };
        assert_eq!(assemble(&input), assemble(&input));
    }

    #[test]
    fn day_number_formatting() {
        assert_eq!(format_day_number(7.0), "7");
        assert_eq!(format_day_number(2.5), "2.5");
    }
}
