use opencc_trie::dictionary_lib::{DictSource, DictionaryStore, Trie};
use opencc_trie::{BuildWarning, ConverterOptions, Locale, OpenCC, Pipeline, PresetTable};

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    /// A miniature of the OpenCC dictionary set, enough for every preset direction.
    fn sample_store() -> DictionaryStore {
        let mut store = DictionaryStore::new();
        store.insert("STCharacters", DictSource::from("龙 龍|马 馬|汉 漢|语 語|软 軟|件 件|后 後|发 發|头 頭"));
        store.insert("STPhrases", DictSource::from("软件 軟件|头发 頭髮|皇后 皇后"));
        store.insert("TSCharacters", DictSource::from("龍 龙|馬 马|漢 汉|語 语|軟 软|後 后|發 发|頭 头|髮 发"));
        store.insert("TSPhrases", DictSource::from("皇后 皇后"));
        store.insert("TWVariants", DictSource::from("台 臺|着 著"));
        store.insert("TWVariantsRevPhrases", DictSource::from("臺灣 台灣"));
        store.insert("TWPhrasesIT", DictSource::from("軟件 軟體"));
        store.insert("TWPhrasesName", DictSource::from(""));
        store.insert("TWPhrasesOther", DictSource::from("意大利 義大利"));
        store.insert("HKVariants", DictSource::from("着 着|僞 偽"));
        store.insert("JPVariants", DictSource::from("廣 広|國 国|讀 読|賣 売"));
        store.insert("JPShinjitaiCharacters", DictSource::from("広 廣|国 國|読 讀|売 賣"));
        store.insert("JPShinjitaiPhrases", DictSource::from(""));
        store.with_standard_reverses();
        store
    }

    fn opencc(from: Locale, to: Locale) -> OpenCC {
        OpenCC::new(&ConverterOptions::new(from, to), &sample_store(), PresetTable::standard())
    }

    fn custom_dir(phrases: Option<&str>, fixes: Option<&str>) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        if let Some(content) = phrases {
            fs::write(dir.path().join("CNTWPhrases.txt"), content).unwrap();
        }
        if let Some(content) = fixes {
            fs::write(dir.path().join("CharFixes.txt"), content).unwrap();
        }
        dir
    }

    fn options_with_dir(from: Locale, to: Locale, dir: &Path) -> ConverterOptions {
        ConverterOptions::new(from, to).with_custom_dir(dir)
    }

    #[test]
    fn empty_input_test() {
        let pipelines = [
            Pipeline::identity(),
            Pipeline::single(DictSource::from("中 中|中国 中國")),
            opencc(Locale::Cn, Locale::Twp).pipeline().clone(),
        ];
        for pipeline in pipelines {
            assert_eq!(pipeline.convert(""), "");
        }
    }

    #[test]
    fn longest_match_test() {
        let input = "中国人民";
        let expected_output = "中國人民";
        let pipeline = Pipeline::single(DictSource::from("中 中|中国 中國|中国人 中國人"));
        let actual_output = pipeline.convert(input);
        assert_eq!(actual_output, expected_output);
    }

    #[test]
    fn non_bmp_test() {
        let input = "俨骖𬴂于上路，访风景于崇阿";
        let expected_output = "儼驂騑於上路，訪風景於崇阿";
        let pipeline = Pipeline::single(DictSource::from(
            "俨 儼|骖 驂|𬴂 騑|于 於|访 訪|风 風",
        ));
        let actual_output = pipeline.convert(input);
        assert_eq!(actual_output, expected_output);
    }

    #[test]
    fn non_bmp_key_with_shared_surrogate_test() {
        // U+20000 and U+20001 share a UTF-16 high surrogate; neither may match the other.
        let pipeline = Pipeline::single(DictSource::from("𠀀𠀁 AB|𠀁 b"));
        assert_eq!(pipeline.convert("𠀀𠀀𠀁𠀁"), "𠀀ABb");
    }

    #[test]
    fn sequential_composition_test() {
        let input = "软件";
        let expected_output = "軟件";
        let pipeline = Pipeline::build(&[
            vec![DictSource::from("软 軟|件 體")],
            vec![DictSource::from("軟體 軟件")],
        ]);
        let actual_output = pipeline.convert(input);
        assert_eq!(actual_output, expected_output);
    }

    #[test]
    fn custom_overlay_ordering_test() {
        let input = "自定义";
        let expected_output = "自訂";
        let pipeline = Pipeline::build(&[
            vec![DictSource::from("自定义 自訂")],
            vec![DictSource::from("自定義 自定義|义 義")],
        ]);
        let actual_output = pipeline.convert(input);
        assert_eq!(actual_output, expected_output);
    }

    #[test]
    fn unmatched_text_identity_test() {
        let pipeline = Pipeline::single(DictSource::from("龙 龍|马 馬"));
        for input in ["hello, world!", "你好，世界！", "𠀀𠀁\t\n", "ｆｕｌｌ　ｗｉｄｔｈ"] {
            let actual_output = pipeline.convert(input);
            assert_eq!(actual_output, input);
            assert_eq!(actual_output.len(), input.len());
        }
    }

    #[test]
    fn parser_robustness_test() {
        let dict = DictSource::from("测试 測試|成功");
        let mut trie = Trie::new();
        assert_eq!(trie.load_dict(&dict), 1);
        assert_eq!(trie.len(), 1);
        assert_eq!(trie.get("测试"), Some("測試"));
        assert_eq!(trie.get("成功"), None);

        // Only "测试" converts; "成功" passes through unmatched.
        let pipeline = Pipeline::single(dict);
        assert_eq!(pipeline.convert("测试成功"), "測試成功");
        assert_eq!(pipeline.convert("成功"), "成功");
    }

    #[test]
    fn cn2tw_test() {
        let input = "龙马精神，台湾";
        let expected_output = "龍馬精神，臺湾";
        let actual_output = opencc(Locale::Cn, Locale::Tw).convert(input);
        assert_eq!(actual_output, expected_output);
    }

    #[test]
    fn cn2twp_test() {
        let input = "汉语软件，意大利";
        let expected_output = "漢語軟體，義大利";
        let actual_output = opencc(Locale::Cn, Locale::Twp).convert(input);
        assert_eq!(actual_output, expected_output);
    }

    #[test]
    fn twp2cn_test() {
        let input = "漢語軟體，義大利";
        let expected_output = "汉语软件，意大利";
        let converter = opencc(Locale::Twp, Locale::Cn);
        let actual_output = converter.convert(input);
        assert_eq!(actual_output, expected_output);
    }

    #[test]
    fn tw2t_reverse_phrases_test() {
        let input = "臺灣";
        let expected_output = "台灣";
        let actual_output = opencc(Locale::Tw, Locale::T).convert(input);
        assert_eq!(actual_output, expected_output);
    }

    #[test]
    fn t2jp_test() {
        let input = "舊字體：廣國，讀賣。";
        let expected_output = "舊字體：広国，読売。";
        let actual_output = opencc(Locale::T, Locale::Jp).convert(input);
        assert_eq!(actual_output, expected_output);
    }

    #[test]
    fn jp2t_test() {
        let input = "広国，読売。";
        let expected_output = "廣國，讀賣。";
        let actual_output = opencc(Locale::Jp, Locale::T).convert(input);
        assert_eq!(actual_output, expected_output);
    }

    #[test]
    fn phrase_beats_characters_in_one_group_test() {
        // STCharacters and STPhrases share a stage, so 头发 wins over 发.
        let input = "头发发展";
        let expected_output = "頭髮發展";
        let actual_output = opencc(Locale::Cn, Locale::T).convert(input);
        assert_eq!(actual_output, expected_output);
    }

    #[test]
    fn missing_dictionary_warning_test() {
        let store = sample_store();
        let presets = PresetTable::default()
            .with_to_standard(Locale::Cn, ["STCharacters", "NoSuchDict"])
            .with_from_standard(Locale::Hk, ["AlsoMissing"]);

        let converter = OpenCC::new(&ConverterOptions::new(Locale::Cn, Locale::Hk), &store, &presets);

        assert_eq!(
            converter.warnings(),
            &[
                BuildWarning::MissingDictionary { name: "NoSuchDict".to_string() },
                BuildWarning::MissingDictionary { name: "AlsoMissing".to_string() },
            ]
        );
        assert_eq!(converter.pipeline().stage_count(), 1);
        assert_eq!(converter.convert("龙马"), "龍馬");
    }

    #[test]
    fn empty_store_degrades_to_identity_test() {
        let converter = OpenCC::new(
            &ConverterOptions::new(Locale::Cn, Locale::Tw),
            &DictionaryStore::new(),
            PresetTable::standard(),
        );
        assert_eq!(converter.warnings().len(), 3);
        assert_eq!(converter.pipeline().stage_count(), 0);
        assert_eq!(converter.convert("龙马精神"), "龙马精神");
    }

    #[test]
    fn custom_dict_overrides_standard_test() {
        let converter = opencc(Locale::Cn, Locale::Tw).with_custom_dict(DictSource::Pairs(vec![(
            "龍馬".to_string(),
            "龍駒".to_string(),
        )]));
        assert_eq!(converter.convert("龙马精神"), "龍駒精神");
    }

    #[test]
    fn custom_phrases_loaded_for_twp_test() {
        let dir = custom_dir(Some("# CN -> TW\n出租车\t計程車\n"), None);
        let store = sample_store();

        let to_twp = OpenCC::new(
            &options_with_dir(Locale::Cn, Locale::Twp, dir.path()),
            &store,
            PresetTable::standard(),
        );
        assert_eq!(to_twp.convert("出租车"), "計程車");

        let to_tw = OpenCC::new(
            &options_with_dir(Locale::Cn, Locale::Tw, dir.path()),
            &store,
            PresetTable::standard(),
        );
        assert_eq!(to_tw.convert("出租车"), "出租车");

        let forced = OpenCC::new(
            &options_with_dir(Locale::Cn, Locale::Tw, dir.path()).with_custom_phrases(true),
            &store,
            PresetTable::standard(),
        );
        assert_eq!(forced.convert("出租车"), "計程車");
    }

    #[test]
    fn custom_phrases_reversed_for_twp2cn_test() {
        let dir = custom_dir(Some("出租车\t計程車\n"), None);
        let converter = OpenCC::new(
            &options_with_dir(Locale::Twp, Locale::Cn, dir.path()),
            &sample_store(),
            PresetTable::standard(),
        );
        assert_eq!(converter.convert("計程車"), "出租车");
    }

    #[test]
    fn char_fixes_applied_last_test() {
        let dir = custom_dir(None, Some("# fixes\n臺\t台\n"));
        let store = sample_store();

        let fixed = OpenCC::new(
            &options_with_dir(Locale::Cn, Locale::Tw, dir.path()),
            &store,
            PresetTable::standard(),
        );
        assert_eq!(fixed.pipeline().stage_count(), 3);
        assert_eq!(fixed.convert("台"), "台");

        let unfixed = OpenCC::new(
            &options_with_dir(Locale::Cn, Locale::Tw, dir.path()).with_char_fixes(false),
            &store,
            PresetTable::standard(),
        );
        assert_eq!(unfixed.convert("台"), "臺");
    }

    #[test]
    fn custom_stage_order_test() {
        // phrases -> user dict -> char fixes, each seeing the previous output.
        let dir = custom_dir(Some("甲\t乙\n"), Some("丙\t丁\n"));
        let options = options_with_dir(Locale::T, Locale::Twp, dir.path()).with_custom_dict("乙 丙");
        let converter = OpenCC::new(&options, &sample_store(), PresetTable::standard());
        assert_eq!(converter.convert("甲"), "丁");
    }

    #[test]
    fn missing_custom_files_are_silent_test() {
        let dir = custom_dir(None, None);
        let converter = OpenCC::new(
            &options_with_dir(Locale::Cn, Locale::Twp, dir.path()),
            &sample_store(),
            PresetTable::standard(),
        );
        assert!(converter.warnings().is_empty());
        assert_eq!(converter.pipeline().stage_count(), 2);
    }

    #[test]
    fn convert_batch_test() {
        let inputs = vec!["龙马".to_string(), String::new(), "汉语".to_string()];
        let mut converter = opencc(Locale::Cn, Locale::T);
        let expected_output = vec!["龍馬", "", "漢語"];
        assert_eq!(converter.convert_batch(&inputs), expected_output);
        converter.set_parallel(false);
        assert_eq!(converter.convert_batch(&inputs), expected_output);
    }

    #[test]
    fn shared_converter_threads_test() {
        let convert = opencc(Locale::Cn, Locale::Tw).into_fn();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let convert = convert.clone();
                std::thread::spawn(move || convert("龙马精神"))
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), "龍馬精神");
        }
    }

    #[test]
    fn locale_parse_test() {
        assert_eq!(Locale::try_from("twp"), Ok(Locale::Twp));
        assert!(Locale::try_from("s2t").is_err());
        let json = serde_json::to_string(&Locale::Hk).unwrap();
        assert_eq!(json, r#""hk""#);
    }
}
